//! Integration tests for Sidekick
//!
//! These tests run the full assembly-to-generation pipeline: catalog
//! template, subcommand resolution, composition, and the decode loop against
//! a scripted in-process backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use promptbook::{Catalog, GenerationParams, Resolver, Selection, compose};
use sidekick::engine::{
    BackendError, DecodeStep, GenerateOptions, GenerateOutput, GenerateRequest, Generator, ModelBackend, ModelLoader,
    ProgressFn, StepDirective, StepFn, TokenDecoder,
};
use sidekick::remote::{ChatRequest, ChatRole};

// =============================================================================
// Scripted Backend
// =============================================================================

/// Emits one token per script fragment; decoding concatenates the fragments
/// for the given ids
struct FragmentBackend {
    fragments: Arc<Vec<String>>,
    load_calls: AtomicUsize,
    last_request: std::sync::Mutex<Option<GenerateRequest>>,
}

struct FragmentHandle {
    fragments: Arc<Vec<String>>,
}

struct FragmentDecoder {
    fragments: Arc<Vec<String>>,
}

impl FragmentBackend {
    fn new(fragments: Vec<&str>) -> Self {
        Self {
            fragments: Arc::new(fragments.into_iter().map(String::from).collect()),
            load_calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        }
    }

    fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl TokenDecoder for FragmentDecoder {
    fn decode(&self, tokens: &[u32]) -> String {
        tokens
            .iter()
            .filter_map(|&id| self.fragments.get(id as usize))
            .map(String::as_str)
            .collect()
    }
}

#[async_trait]
impl ModelBackend for FragmentBackend {
    type Handle = FragmentHandle;

    fn model_id(&self) -> &str {
        "fragment-test-model"
    }

    async fn load(&self, on_progress: ProgressFn<'_>) -> Result<Self::Handle, BackendError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        on_progress(1.0);
        Ok(FragmentHandle {
            fragments: Arc::clone(&self.fragments),
        })
    }

    async fn generate(
        &self,
        handle: &Self::Handle,
        request: GenerateRequest,
        on_step: StepFn<'_>,
    ) -> Result<GenerateOutput, BackendError> {
        *self.last_request.lock().unwrap() = Some(request);

        let decoder = FragmentDecoder {
            fragments: Arc::clone(&handle.fragments),
        };

        let mut tokens: Vec<u32> = Vec::new();
        for id in 0..handle.fragments.len() as u32 {
            tokens.push(id);
            let step = DecodeStep::new(&tokens, &decoder);
            if on_step(&step) == StepDirective::Stop {
                break;
            }
        }

        Ok(GenerateOutput {
            text: decoder.decode(&tokens),
            token_count: tokens.len() as u32,
        })
    }
}

// =============================================================================
// End-to-End Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_summarize_assembles_and_generates() {
    let catalog = Catalog::builtin();
    let template = catalog.get("summarize").expect("summarize template exists");
    let selections = [Selection::new("wordcount", "120 words")];
    let user_text = "Rust is a systems programming language focused on safety and speed.";

    let resolver = Resolver::new();
    let resolved = resolver
        .resolve(template, &selections, user_text)
        .expect("resolution succeeds");

    // The chosen option text lands in the instruction and the user text is
    // framed by the wrapper
    assert!(resolved.instruction.contains("120 words or less"));
    assert!(!resolved.instruction.contains("{subcommand:wordcount}"));
    assert!(resolved.instruction.contains("$user_prompt=###"));
    assert!(resolved.instruction.contains(user_text));

    let composed = compose(&resolved, None);

    let backend = FragmentBackend::new(vec!["<think>", "outline the gist", "</think>", "Rust ", "is ", "fast."]);
    let generator = Generator::new(Arc::new(ModelLoader::new(backend)));

    let mut calls: Vec<(String, bool)> = Vec::new();
    generator
        .generate(
            &composed.body,
            composed.system_prompt.as_deref(),
            &resolved.params,
            GenerateOptions {
                stream: true,
                show_thinking: false,
            },
            &mut |text, is_final| calls.push((text.to_string(), is_final)),
        )
        .await
        .expect("generation succeeds");

    // One partial at the cadence boundary with the reasoning stripped, then
    // exactly one sanitized final
    assert_eq!(
        calls,
        vec![("Rust ".to_string(), false), ("Rust is fast.".to_string(), true)]
    );

    // The backend saw the fully assembled prompt
    let request = generator
        .loader()
        .backend()
        .last_request()
        .expect("backend saw a request");
    assert!(request.prompt.contains("120 words or less"));
    assert!(request.prompt.contains(user_text));
}

#[tokio::test]
async fn test_system_prompt_reaches_backend_wrapped() {
    let catalog = Catalog::builtin();
    let template = catalog.get("typefaces").expect("typefaces template exists");
    let resolver = Resolver::new();
    let resolved = resolver.resolve(template, &[], "a bakery website").expect("resolution succeeds");
    let composed = compose(&resolved, None);

    assert_eq!(composed.system_prompt.as_deref(), Some("Act like a Designer"));

    let backend = FragmentBackend::new(vec!["serif"]);
    let generator = Generator::new(Arc::new(ModelLoader::new(backend)));

    let mut sink = |_: &str, _: bool| {};
    generator
        .generate(
            &composed.body,
            composed.system_prompt.as_deref(),
            &resolved.params,
            GenerateOptions::default(),
            &mut sink,
        )
        .await
        .expect("generation succeeds");

    let request = generator.loader().backend().last_request().expect("backend saw a request");
    assert!(request.prompt.starts_with("<system>Act like a Designer</system>\n"));
    assert!(request.prompt.contains("a bakery website"));
}

#[tokio::test]
async fn test_model_loads_once_across_generations() {
    let backend = FragmentBackend::new(vec!["one"]);
    let generator = Generator::new(Arc::new(ModelLoader::new(backend)));

    let mut sink = |_: &str, _: bool| {};
    for _ in 0..3 {
        generator
            .generate(
                "prompt",
                None,
                &GenerationParams::default(),
                GenerateOptions::default(),
                &mut sink,
            )
            .await
            .expect("generation succeeds");
    }

    assert_eq!(generator.loader().backend().load_calls(), 1);
    assert!(generator.loader().is_loaded());
}

#[tokio::test]
async fn test_template_token_budget_caps_decode() {
    let backend = FragmentBackend::new(vec!["a", "b", "c", "d", "e"]);
    let generator = Generator::new(Arc::new(ModelLoader::new(backend)));

    let params = GenerationParams {
        maximum_tokens: Some(2),
        ..Default::default()
    };

    let mut calls: Vec<(String, bool)> = Vec::new();
    generator
        .generate(
            "p",
            None,
            &params,
            GenerateOptions {
                stream: false,
                show_thinking: false,
            },
            &mut |text, is_final| calls.push((text.to_string(), is_final)),
        )
        .await
        .expect("generation succeeds");

    assert_eq!(calls, vec![("ab".to_string(), true)]);
}

// =============================================================================
// Remote Request Assembly Tests
// =============================================================================

#[test]
fn test_composed_prompt_becomes_chat_messages() {
    let catalog = Catalog::builtin();
    let template = catalog.get("code").expect("code template exists");
    let resolver = Resolver::new();
    let selections = [Selection::new("language", "javascript")];
    let resolved = resolver
        .resolve(template, &selections, "a debounced search box")
        .expect("resolution succeeds");
    let composed = compose(&resolved, None);

    let request = ChatRequest::from_params(&composed.body, composed.system_prompt.as_deref(), &resolved.params);

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, ChatRole::System);
    assert_eq!(request.messages[0].content, "Act like a Senior Level Engineer");
    assert_eq!(request.messages[1].role, ChatRole::User);
    assert!(request.messages[1].content.contains("javascript"));
    assert_eq!(request.temperature, Some(0.2));
    assert_eq!(request.top_p, None);
}

#[test]
fn test_unknown_selection_fails_resolution() {
    let catalog = Catalog::builtin();
    let template = catalog.get("summarize").expect("summarize template exists");
    let resolver = Resolver::new();

    let err = resolver
        .resolve(template, &[Selection::new("wordcount", "a million words")], "text")
        .unwrap_err();
    assert!(err.to_string().contains("unknown selection"));
}
