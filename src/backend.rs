use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::cache::{CLEANUP_INTERVAL, CachedRegistry, MemoryCache};
use crate::config::Config;
use crate::document::DocumentState;
use crate::file_types::is_pubspec_uri;
use crate::parsers::ManifestReader;
use crate::parsers::pubspec::PubspecParser;
use crate::providers::code_actions::create_code_actions;
use crate::providers::diagnostics::create_diagnostics;
use crate::providers::hover::{create_hover, dependency_at};
use crate::registries::Registry;
use crate::registries::http_client::create_client_with_timeout;
use crate::registries::pub_dev::PubDevRegistry;
use crate::scanner::check_dependencies;

/// Registry stack used by the server: pub.dev behind the in-memory cache
pub type PubRegistry = CachedRegistry<PubDevRegistry>;

pub struct PubspecBackend {
    client: Client,
    /// Configuration
    config: RwLock<Config>,
    /// Parsed state of open pubspec files
    documents: DashMap<Url, DocumentState>,
    parser: PubspecParser,
    /// Replaced when initialization options point at another registry
    registry: RwLock<Arc<PubRegistry>>,
}

impl PubspecBackend {
    pub fn new(client: Client, registry: PubRegistry) -> Self {
        registry.cache().spawn_cleanup_task(CLEANUP_INTERVAL);
        Self {
            client,
            config: RwLock::new(Config::default()),
            documents: DashMap::new(),
            parser: PubspecParser::new(),
            registry: RwLock::new(Arc::new(registry)),
        }
    }

    fn config(&self) -> Config {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn registry(&self) -> Arc<PubRegistry> {
        match self.registry.read() {
            Ok(registry) => Arc::clone(&registry),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Rebuild the registry client from configuration
    fn apply_registry_config(&self, config: &Config) {
        let http_client = match create_client_with_timeout(config.registry.timeout()) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Keeping default registry client: {e}");
                return;
            }
        };
        let registry = CachedRegistry::new(
            PubDevRegistry::with_base_url(http_client, &config.registry.url),
            MemoryCache::with_ttl(config.cache.ttl()),
        );
        tracing::info!("Using registry {}", registry.inner().base_url());
        registry.cache().spawn_cleanup_task(CLEANUP_INTERVAL);

        match self.registry.write() {
            Ok(mut current) => *current = Arc::new(registry),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(registry),
        }
    }

    /// Process a document: scan it and publish diagnostics
    async fn process_document(&self, uri: &Url, content: &str) {
        if !is_pubspec_uri(uri) {
            return;
        }

        let config = self.config();
        let registry = self.registry();

        let dependencies = self.parser.extract_dependencies(content);
        tracing::info!("Parsed {} dependencies from {}", dependencies.len(), uri.path());
        let report = check_dependencies(
            uri.path(),
            &dependencies,
            registry.as_ref(),
            &config.scan_filter(),
        )
        .await;

        let diagnostics = if config.diagnostics.enabled {
            create_diagnostics(
                &report,
                &dependencies,
                config.diagnostics.severity_level(),
                config.diagnostics.show_unchecked,
            )
        } else {
            Vec::new()
        };

        self.documents.insert(
            uri.clone(),
            DocumentState {
                dependencies,
                report,
            },
        );

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for PubspecBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Parse configuration from initialization options
        let config = Config::from_init_options(params.initialization_options);
        tracing::info!("Configuration: {config:?}");

        self.apply_registry_config(&config);

        match self.config.write() {
            Ok(mut cfg) => *cfg = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "pubspec-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "pubspec-lsp initialized")
            .await;
        tracing::info!("pubspec-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!(
            "pubspec-lsp shutting down ({} cached packages)",
            self.registry().cache().len()
        );
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let content = params.text_document.text;

        tracing::debug!("Document opened: {uri}");
        self.process_document(&uri, &content).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // With FULL sync, we get the entire document content
        if let Some(change) = params.content_changes.into_iter().next() {
            tracing::debug!("Document changed: {uri}");
            self.process_document(&uri, &change.text).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;

        if let Some(text) = params.text {
            tracing::debug!("Document saved: {uri}");
            self.process_document(&uri, &text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {uri}");
        self.documents.remove(&uri);

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(doc) = self.documents.get(uri) else {
            return Ok(None);
        };
        let Some(dep) = dependency_at(&doc.dependencies, position).cloned() else {
            return Ok(None);
        };
        // Drop the lock before async call
        drop(doc);

        if !self.config().scan_filter().accepts(&dep) {
            tracing::debug!("Not looking up ignored package {}", dep.name);
            return Ok(None);
        }

        let info = match self.registry().get_version_info(&dep.name).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!("Hover lookup for {} failed: {}", dep.name, e);
                None
            }
        };

        Ok(Some(create_hover(&dep, info.as_ref())))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = &params.text_document.uri;

        let Some(doc) = self.documents.get(uri) else {
            return Ok(Some(vec![]));
        };

        let actions = create_code_actions(&doc.report.findings, &doc.dependencies, uri, params.range);

        Ok(Some(actions))
    }
}
