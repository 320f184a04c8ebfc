//! Session integration tests.
//!
//! End-to-end behaviour of a resolver session over an in-memory project:
//! configuration, graph loading, package loading and engine feeding.

use std::sync::Arc;

use typefeed_loader::{
    ConfigSource, LoadOutcome, LoaderConfig, RecordingEngine, Session, SessionPhase, SkipReason,
};
use typefeed_vfs::MemoryFs;

type TestSession = Session<MemoryFs, RecordingEngine>;

/// Helper: a session over the given files, loader defaults.
fn session(files: &[(&str, &str)]) -> TestSession {
    session_with(files, LoaderConfig::default())
}

fn session_with(files: &[(&str, &str)], config: LoaderConfig) -> TestSession {
    let fs = MemoryFs::with_files(files.iter().copied());
    Session::new(Arc::new(fs), RecordingEngine::new()).with_loader_config(config)
}

/// Loader config with no priority packages, so tests see only their own files.
fn quiet_config() -> LoaderConfig {
    LoaderConfig {
        priority_packages: Vec::new(),
        ..LoaderConfig::default()
    }
}

const ALIAS_CONFIG: &str = r#"{
    "compilerOptions": {
        "baseUrl": ".",
        "paths": { "@/*": ["src/*"] }
    }
}"#;

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_register_twice_feeds_engine_once() {
    let mut session = session(&[]);
    assert!(session.register("src/a.ts", "export const a = 1;"));
    assert!(!session.register("src/a.ts", "export const a = 1;"));

    assert_eq!(session.corpus().len(), 1);
    assert_eq!(session.engine().extra_sources.len(), 1);
    assert_eq!(session.engine().models.len(), 1);
}

#[tokio::test]
async fn test_activate_twice_reads_nothing_new() {
    let mut session = session(&[
        ("src/main.ts", "import './a';"),
        ("src/a.ts", "export {};"),
    ]);
    session.activate("src/main.ts").await;
    let fed = session.engine().extra_sources.len();

    assert_eq!(session.activate("src/main.ts").await, LoadOutcome::AlreadyLoaded);
    assert_eq!(session.engine().extra_sources.len(), fed);
}

// ============================================================================
// Termination
// ============================================================================

#[tokio::test]
async fn test_cycle_terminates_with_each_file_once() {
    let mut session = session(&[
        ("src/a.ts", "import { b } from './b';\nexport const a = 1;"),
        ("src/b.ts", "import { a } from './a';\nexport const b = 2;"),
    ]);
    let outcome = session.load_source("src/a.ts", 0).await;

    assert_eq!(outcome, LoadOutcome::Loaded("src/a.ts".into()));
    assert_eq!(
        session.engine().source_uris(),
        vec!["file:///src/a.ts", "file:///src/b.ts"]
    );
}

#[tokio::test]
async fn test_diamond_registers_shared_file_once() {
    let mut session = session(&[
        ("main.ts", "import './left';\nimport './right';"),
        ("left.ts", "import './shared';"),
        ("right.ts", "import './shared';"),
        ("shared.ts", ""),
    ]);
    session.load_source("main.ts", 0).await;

    assert_eq!(session.corpus().len(), 4);
    assert_eq!(session.engine().extra_sources.len(), 4);
}

// ============================================================================
// Depth bound
// ============================================================================

fn chain(len: usize) -> Vec<(String, String)> {
    (0..len)
        .map(|i| {
            (
                format!("chain/f{}.ts", i),
                format!("import './f{}';", i + 1),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_chain_longer_than_bound_registers_bound_files() {
    let files = chain(15);
    let fs = MemoryFs::with_files(files.iter().map(|(p, c)| (p.as_str(), c.clone())));
    let config = LoaderConfig {
        max_source_depth: 10,
        ..quiet_config()
    };
    let mut session = Session::new(Arc::new(fs), RecordingEngine::new()).with_loader_config(config);

    session.load_source("chain/f0.ts", 0).await;

    assert_eq!(session.corpus().len(), 10);
    assert!(session.corpus().contains("chain/f9.ts"));
    assert!(!session.corpus().contains("chain/f10.ts"));
}

#[tokio::test]
async fn test_request_at_bound_is_skipped() {
    let mut session = session(&[("a.ts", "")]);
    let bound = session.loader_config().max_source_depth;
    assert_eq!(
        session.load_source("a.ts", bound).await,
        LoadOutcome::Skipped(SkipReason::DepthExceeded)
    );
    assert!(session.corpus().is_empty());
}

// ============================================================================
// Aliases
// ============================================================================

#[tokio::test]
async fn test_first_declared_alias_pattern_wins() {
    let mut session = session(&[
        (
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["src/*"], "@/*": ["lib/*"] } } }"#,
        ),
        ("main.ts", "import { x } from '@/x';"),
        ("lib/x.ts", "export const x = 1;"),
    ]);
    session.activate("main.ts").await;

    assert_eq!(session.aliases().resolve("@/x").as_deref(), Some("src/x"));
    assert!(!session.corpus().contains("lib/x.ts"));
    assert_eq!(session.discovered_packages().count(), 0);
}

#[tokio::test]
async fn test_alias_substitution_prefers_ts() {
    let mut session = session(&[
        ("tsconfig.json", ALIAS_CONFIG),
        ("src/main.tsx", "import { cn } from '@/lib/utils';"),
        ("src/lib/utils.ts", "export const cn = 1;"),
        ("src/lib/utils.tsx", ""),
        ("src/lib/utils.js", ""),
    ]);
    session.activate("src/main.tsx").await;

    assert_eq!(session.aliases().resolve("@/lib/utils").as_deref(), Some("src/lib/utils"));
    assert!(session.corpus().contains("src/lib/utils.ts"));
    assert!(!session.corpus().contains("src/lib/utils.tsx"));
    assert!(!session.corpus().contains("src/lib/utils.js"));
}

#[tokio::test]
async fn test_later_target_used_when_first_is_missing() {
    let mut session = session(&[
        (
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "~/*": ["generated/*", "src/*"] } } }"#,
        ),
        ("main.ts", "import '~/util';"),
        ("src/util.ts", ""),
    ]);
    session.activate("main.ts").await;
    assert!(session.corpus().contains("src/util.ts"));
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_only_external_specifiers_reach_package_loader() {
    let mut session = session_with(
        &[
            ("tsconfig.json", ALIAS_CONFIG),
            (
                "src/main.ts",
                "import './local';\nimport '@/aliased';\nimport '@/missing';\nimport React from 'react';\nimport { z } from 'zod/v4';",
            ),
            ("src/local.ts", ""),
            ("src/aliased.ts", ""),
            ("node_modules/zod/package.json", r#"{ "types": "index.d.ts" }"#),
            ("node_modules/zod/index.d.ts", "export {};"),
        ],
        quiet_config(),
    );
    session.activate("src/main.ts").await;
    assert_eq!(
        session.discovered_packages().collect::<Vec<_>>(),
        vec!["react", "zod"]
    );

    let registered = session.load_discovered_packages().await;
    assert_eq!(registered, 1);
    assert!(session.is_package_loaded("react"));
    assert!(session.corpus().contains("node_modules/zod/index.d.ts"));
    assert_eq!(session.discovered_packages().count(), 0);
}

#[tokio::test]
async fn test_default_config_routes_aliases_to_packages() {
    let mut session = session(&[
        ("src/main.ts", "import { cn } from '@/lib/utils';"),
        ("src/lib/utils.ts", ""),
    ]);
    session.activate("src/main.ts").await;

    assert_eq!(session.config_source(), &ConfigSource::Default);
    assert!(session.options().paths.is_empty());
    assert!(!session.corpus().contains("src/lib/utils.ts"));
    assert_eq!(session.discovered_packages().collect::<Vec<_>>(), vec!["@/lib"]);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_initialize_loads_packages_then_entry() {
    let mut session = session(&[
        ("tsconfig.json", ALIAS_CONFIG),
        ("node_modules/@types/react/index.d.ts", "declare const React: any;"),
        ("node_modules/@types/node/index.d.ts", "declare module 'fs' {}"),
        ("node_modules/clsx/package.json", r#"{ "types": "clsx.d.ts" }"#),
        ("node_modules/clsx/clsx.d.ts", ""),
        ("src/main.tsx", "import { Button } from '@/ui/button';\nimport fs from 'node:fs';"),
        ("src/ui/button.tsx", "import { clsx } from 'clsx';"),
    ]);
    assert_eq!(session.phase(), SessionPhase::Uninitialized);

    let outcome = session.initialize("src/main.tsx").await;

    assert_eq!(outcome, LoadOutcome::Loaded("src/main.tsx".into()));
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.engine().options_updates, 1);
    assert_eq!(
        session.corpus().paths().collect::<Vec<_>>(),
        vec![
            "node_modules/@types/react/index.d.ts",
            "node_modules/clsx/clsx.d.ts",
            "node_modules/@types/node/index.d.ts",
            "src/main.tsx",
            "src/ui/button.tsx",
        ]
    );
    assert_eq!(
        session.engine().model_uris(),
        vec!["file:///src/main.tsx", "file:///src/ui/button.tsx"]
    );
    assert_eq!(session.discovered_packages().count(), 0);
}

#[tokio::test]
async fn test_activate_after_ready_grows_corpus() {
    let mut session = session_with(
        &[
            ("src/main.ts", ""),
            ("src/other.ts", "import './helper';"),
            ("src/helper.ts", ""),
        ],
        quiet_config(),
    );
    session.initialize("src/main.ts").await;
    assert_eq!(session.corpus().len(), 1);

    session.activate("src/other.ts").await;
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(
        session.corpus().paths().collect::<Vec<_>>(),
        vec!["src/main.ts", "src/other.ts", "src/helper.ts"]
    );
}

#[tokio::test]
async fn test_teardown_returns_engine() {
    let mut session = session_with(&[("a.ts", "")], quiet_config());
    session.initialize("a.ts").await;
    let engine = session.teardown();
    assert_eq!(engine.source_uris(), vec!["file:///a.ts"]);
}

#[tokio::test]
async fn test_missing_entry_still_reaches_ready() {
    let mut session = session_with(&[], quiet_config());
    assert_eq!(session.initialize("src/gone.ts").await, LoadOutcome::NotFound);
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert!(session.corpus().is_empty());
}

// ============================================================================
// Size filter
// ============================================================================

#[tokio::test]
async fn test_oversized_stub_is_never_registered() {
    let threshold = 64;
    let big = "x".repeat(threshold);
    let small = "x".repeat(threshold - 1);
    let fs = MemoryFs::with_files([
        ("node_modules/@types/huge/index.d.ts", big),
        ("node_modules/@types/huge/part.d.ts", small),
    ]);
    let config = LoaderConfig {
        max_declaration_size: threshold,
        ..quiet_config()
    };
    let mut session = Session::new(Arc::new(fs), RecordingEngine::new()).with_loader_config(config);

    session.preload_packages().await;

    assert!(!session.corpus().contains("node_modules/@types/huge/index.d.ts"));
    assert!(session.corpus().contains("node_modules/@types/huge/part.d.ts"));
}

// ============================================================================
// I/O failures
// ============================================================================

#[tokio::test]
async fn test_unreadable_import_does_not_stop_siblings() {
    let fs = MemoryFs::with_files([
        ("main.ts", "import './a';\nimport './b';"),
        ("a.ts", ""),
        ("b.ts", ""),
    ]);
    fs.fail_on("a.ts");
    let mut session = Session::new(Arc::new(fs), RecordingEngine::new());

    session.load_source("main.ts", 0).await;

    assert!(!session.corpus().contains("a.ts"));
    assert!(session.corpus().contains("b.ts"));
}

#[tokio::test]
async fn test_unreadable_config_falls_back() {
    let fs = MemoryFs::with_files([("tsconfig.json", ALIAS_CONFIG)]);
    fs.fail_on("tsconfig.json");
    let mut session = Session::new(Arc::new(fs), RecordingEngine::new());

    session.configure().await;

    assert_eq!(session.config_source(), &ConfigSource::Default);
    assert_eq!(session.phase(), SessionPhase::ConfigLoaded);
}
