//! Built-in template catalog
//!
//! Stock templates are compiled into the binary from .pmt files. The catalog
//! is static data: ordered, keyed by unique id, never mutated at runtime.

use crate::params::GenerationParams;
use crate::template::{SubcommandOption, SubcommandSpec, Template};

const REWORD: &str = include_str!("../prompts/reword.pmt");
const SUMMARIZE: &str = include_str!("../prompts/summarize.pmt");
const BRAINSTORM: &str = include_str!("../prompts/brainstorm.pmt");
const TYPEFACES: &str = include_str!("../prompts/typefaces.pmt");
const CODE: &str = include_str!("../prompts/code.pmt");
const WRITING: &str = include_str!("../prompts/writing.pmt");
const COLORS_SHADES: &str = include_str!("../prompts/colors-shades.pmt");
const COLORS_SCENES: &str = include_str!("../prompts/colors-scenes.pmt");
const JOBS_COVER_LETTER: &str = include_str!("../prompts/jobs-cover-letter.pmt");
const JOBS_RESUME: &str = include_str!("../prompts/jobs-resume.pmt");
const JOBS_RESEARCH_COMPANY: &str = include_str!("../prompts/jobs-research-company.pmt");
const JOBS_RESEARCH_OPPORTUNITY: &str = include_str!("../prompts/jobs-research-opportunity.pmt");

/// The stock templates, in listing order
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    /// Build the built-in catalog
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                jobs(),
                reword(),
                summarize(),
                brainstorm(),
                colors(),
                typefaces(),
                code(),
                writing(),
            ],
        }
    }

    /// All templates in listing order
    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }
}

fn jobs() -> Template {
    Template::system("jobs", "")
        .with_description("Write a cover letter, revise a resumé, or research a company...")
        .with_params(GenerationParams {
            temperature: Some(0.4),
            system_prompt: Some("Act like a Career Advisor".to_string()),
            ..Default::default()
        })
        .with_subcommands(vec![
            SubcommandSpec::new(
                "subject",
                vec![
                    SubcommandOption::conditional_gate("research"),
                    SubcommandOption {
                        accepts_file: true,
                        allowed_file_extensions: vec!["pdf".to_string()],
                        helper_text: Some(
                            "Add a portion of your resume & paste a job description here".to_string(),
                        ),
                        file_description: Some("Resumé".to_string()),
                        ..SubcommandOption::overriding("cover letter", JOBS_COVER_LETTER.trim_end())
                    },
                    SubcommandOption {
                        accepts_file: true,
                        allowed_file_extensions: vec!["pdf".to_string()],
                        helper_text: Some(
                            "Add a portion of your resume & paste a job description here".to_string(),
                        ),
                        file_description: Some("Resumé".to_string()),
                        ..SubcommandOption::overriding("resumé", JOBS_RESUME.trim_end())
                    },
                ],
            ),
            SubcommandSpec::conditional(
                "research",
                "subject",
                vec![
                    SubcommandOption {
                        helper_text: Some(
                            "Type a company name or website to receive research notes".to_string(),
                        ),
                        ..SubcommandOption::overriding("company", JOBS_RESEARCH_COMPANY.trim_end())
                    },
                    SubcommandOption {
                        helper_text: Some(
                            "Describe your professional title, job, or trade to find potential employers"
                                .to_string(),
                        ),
                        ..SubcommandOption::overriding("opportunity", JOBS_RESEARCH_OPPORTUNITY.trim_end())
                    },
                ],
            ),
        ])
}

fn reword() -> Template {
    Template::system("reword", REWORD.trim_end())
        .with_description("Reword a phrase or passage from another perspective...")
}

fn summarize() -> Template {
    Template::system("summarize", SUMMARIZE.trim_end())
        .with_description("Summarize any text into the length of your choosing...")
        .with_helper_text("Paste something to summarize here")
        .with_subcommands(vec![SubcommandSpec::new(
            "wordcount",
            vec![
                SubcommandOption::new("60 words", "60 words or less"),
                SubcommandOption::new("120 words", "120 words or less"),
                SubcommandOption::new("300 words", "300 words or less"),
                SubcommandOption::new("400 words", "400 words or less"),
                SubcommandOption::new("500 words", "500 words or less"),
                SubcommandOption::new("600 words", "600 words or less"),
            ],
        )])
}

fn brainstorm() -> Template {
    Template::system("brainstorm", BRAINSTORM.trim_end())
        .with_description("Brainstorm ideas on anything, maybe on building something new...")
        .with_helper_text("Describe your idea or general topics around it here")
        .with_params(GenerationParams {
            temperature: Some(0.7),
            ..Default::default()
        })
        .with_subcommands(vec![SubcommandSpec::new(
            "subject",
            vec![
                SubcommandOption::new("writing", "writing"),
                SubcommandOption::new("product", "product development"),
                SubcommandOption::new("music", "music or composition"),
                SubcommandOption::new("speeches", "speech writing"),
                SubcommandOption::new("cooking", "cooking"),
                SubcommandOption::new("mixology", "mixology"),
                SubcommandOption::new("teaching", "teaching or lesson plans"),
            ],
        )])
}

fn colors() -> Template {
    Template::system("colors", "")
        .with_description("Generate complimentary colors or describe the palette of a scene...")
        .with_params(GenerationParams {
            temperature: Some(0.75),
            system_prompt: Some("Act like a Designer".to_string()),
            ..Default::default()
        })
        .with_subcommands(vec![SubcommandSpec::new(
            "comparison",
            vec![
                SubcommandOption {
                    helper_text: Some("Name a color and see suggestions".to_string()),
                    ..SubcommandOption::overriding("shades", COLORS_SHADES.trim_end())
                },
                SubcommandOption {
                    helper_text: Some("The color palette of a New York summer night...".to_string()),
                    ..SubcommandOption::overriding("scenes", COLORS_SCENES.trim_end())
                },
            ],
        )])
}

fn typefaces() -> Template {
    Template::system("typefaces", TYPEFACES.trim_end())
        .with_description("Generate typeface/font suggestions for a website or product...")
        .with_helper_text("What would you like typeface suggestions about..")
        .with_params(GenerationParams {
            temperature: Some(0.75),
            system_prompt: Some("Act like a Designer".to_string()),
            ..Default::default()
        })
}

fn code() -> Template {
    Template::system("code", CODE.trim_end())
        .with_description("Pick a language, type your problem or UI element, see a snippet...")
        .with_helper_text("Describe the UI/UX of the code snippet you'd like here")
        .with_params(GenerationParams {
            temperature: Some(0.2),
            system_prompt: Some("Act like a Senior Level Engineer".to_string()),
            ..Default::default()
        })
        .with_subcommands(vec![SubcommandSpec::new(
            "language",
            vec![
                SubcommandOption::new("swiftui", "swiftui"),
                SubcommandOption::new("swift-uikit", "swift-uikit"),
                SubcommandOption::new("objective-c", "objective-c"),
                SubcommandOption::new("c++", "c++"),
                SubcommandOption::new("java", "java"),
                SubcommandOption::new("c#", "c-sharp / c#"),
                SubcommandOption::new("javascript", "javascript"),
                SubcommandOption::new("html", "html"),
                SubcommandOption::new("php", "php"),
                SubcommandOption::new("flutter", "flutter"),
            ],
        )])
}

fn writing() -> Template {
    Template::system("writing", WRITING.trim_end())
        .with_description("Ideas on how to write or begin to write something...")
        .with_helper_text("Describe what you want written here")
        .with_params(GenerationParams {
            temperature: Some(0.66),
            system_prompt: Some("Act as a prolific and famous writer/author.".to_string()),
            ..Default::default()
        })
        .with_subcommands(vec![
            SubcommandSpec::new(
                "subject",
                vec![
                    SubcommandOption::new("product", "product description"),
                    SubcommandOption::new("intros", "introduction into an essay"),
                    SubcommandOption::new("endings", "conclusion of an essay"),
                    SubcommandOption::new("blog", "blog post"),
                    SubcommandOption::new("social", "social media post"),
                    SubcommandOption::new("article", "news article"),
                ],
            ),
            SubcommandSpec::new(
                "wordcount",
                vec![
                    SubcommandOption::new("24 words", "60 words or less"),
                    SubcommandOption::new("48 words", "120 words or less"),
                    SubcommandOption::new("120 words", "300 words or less"),
                    SubcommandOption::new("300 words", "400 words or less"),
                    SubcommandOption::new("500 words", "500 words or less"),
                    SubcommandOption::new("600 words", "600 words or less"),
                ],
            ),
        ])
}
