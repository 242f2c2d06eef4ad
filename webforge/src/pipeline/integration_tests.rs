//! End-to-end tests of the shipped task graphs under scripted tools.

use crate::config::BuildConfig;
use crate::stages::{RunIdentity, StageContext};
use crate::tasks;
use crate::testing::ScriptedRunner;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn context_in(dir: &Path) -> (StageContext, Arc<BuildConfig>) {
    let config = Arc::new(BuildConfig::for_package("demo", dir));
    (
        StageContext::new(RunIdentity::new(), config.clone()),
        config,
    )
}

/// Wires a runner whose fake cargo/wasm-bindgen/wasm-opt write the files
/// the real tools would.
fn wire_working_tools(runner: &ScriptedRunner, config: &BuildConfig) {
    let binary = config.wasm_binary_path();
    runner.on_invoke("cargo", move |_| {
        std::fs::create_dir_all(binary.parent().unwrap()).unwrap();
        std::fs::write(&binary, b"\0asm compiled").unwrap();
    });

    let module = config.wasm_module_path();
    let glue = config.js_glue_path();
    runner.on_invoke("wasm-bindgen", move |_| {
        std::fs::create_dir_all(module.parent().unwrap()).unwrap();
        std::fs::write(&module, b"\0asm bound bound").unwrap();
        std::fs::write(&glue, b"export default init;").unwrap();
    });

    runner.on_invoke("wasm-opt", |args| {
        let out = &args[args.iter().position(|a| a == "-o").unwrap() + 1];
        std::fs::write(out, b"\0asm opt").unwrap();
    });
}

#[tokio::test]
async fn build_web_runs_tools_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    wire_working_tools(&runner, &config);

    let graph = tasks::build_web(runner.clone()).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(report.success);
    assert_eq!(runner.programs(), vec!["cargo", "wasm-bindgen", "wasm-opt"]);
}

#[tokio::test]
async fn build_web_output_has_module_and_glue_and_no_declarations() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    wire_working_tools(&runner, &config);

    let graph = tasks::build_web(runner).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(report.success);
    assert!(config.wasm_module_path().is_file());
    assert!(config.js_glue_path().is_file());
    assert!(!config.type_declaration_path().exists());

    // The optimizer rewrote the module in place.
    assert_eq!(
        std::fs::read(config.wasm_module_path()).unwrap(),
        b"\0asm opt"
    );
}

#[tokio::test]
async fn build_web_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    wire_working_tools(&runner, &config);

    let graph = tasks::build_web(runner.clone()).unwrap();
    assert!(graph.execute(&ctx).await.success);
    let first = std::fs::read(config.wasm_module_path()).unwrap();

    // Second run regenerates everything from scratch, same bytes.
    let graph = tasks::build_web(runner).unwrap();
    assert!(graph.execute(&ctx).await.success);
    let second = std::fs::read(config.wasm_module_path()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn compile_failure_stops_chain_before_bindgen() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    runner.fail_program("cargo", 101);

    let graph = tasks::build_web(runner.clone()).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(!report.success);
    assert_eq!(report.failed_stage.as_deref(), Some("compile"));
    // Downstream tools were never invoked, output dir never written.
    assert_eq!(runner.programs(), vec!["cargo"]);
    assert!(!dir.path().join("web").exists());
}

#[tokio::test]
async fn bindgen_failure_stops_chain_before_optimize() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    wire_working_tools(&runner, &config);
    runner.fail_program("wasm-bindgen", 1);

    let graph = tasks::build_web(runner.clone()).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(!report.success);
    assert_eq!(report.failed_stage.as_deref(), Some("bindgen"));
    assert_eq!(runner.programs(), vec!["cargo", "wasm-bindgen"]);
}

#[tokio::test]
async fn stats_failure_leaves_build_artifacts_alone() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());
    wire_working_tools(&runner, &config);

    // Build first.
    let graph = tasks::build_web(runner.clone()).unwrap();
    assert!(graph.execute(&ctx).await.success);
    let module_bytes = std::fs::read(config.wasm_module_path()).unwrap();

    // Stats fails; nothing in the output directory changes.
    let stats_runner = Arc::new(ScriptedRunner::new());
    stats_runner.missing_program("tokei");
    let graph = tasks::stats(stats_runner).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(!report.success);
    assert_eq!(
        std::fs::read(config.wasm_module_path()).unwrap(),
        module_bytes
    );
}

#[tokio::test]
async fn stats_succeeds_without_any_build() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _config) = context_in(dir.path());
    let runner = Arc::new(ScriptedRunner::new());

    let graph = tasks::stats(runner.clone()).unwrap();
    let report = graph.execute(&ctx).await;

    assert!(report.success);
    assert_eq!(runner.programs(), vec!["tokei"]);
}
