//! Application state shared by the CLI and the REST API.
//!
//! AppState pins the conversation engine to the Groq provider and keeps the
//! live preview sessions of the REST server. Each session owns its config,
//! its conversation and a cancellation token; sessions share nothing else.
//! Sessions left unused longer than `server.session_idle_secs` are closed by
//! the sweeper the server starts.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use chatforge_core::chat::conversation::Conversation;
use chatforge_core::chat::engine::ConversationEngine;
use chatforge_core::llm::box_provider::BoxCompletionProvider;
use chatforge_infra::config::load_global_config;
use chatforge_infra::filesystem::resolve_data_dir;
use chatforge_infra::llm::groq::GroqProvider;
use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::config::GlobalConfig;

/// One live preview: a chatbot config plus its conversation.
pub struct PreviewSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub config: RwLock<ChatbotConfig>,
    pub conversation: Mutex<Conversation>,
    /// Fired when the session is deleted so an outstanding call stops.
    pub cancel: CancellationToken,
    last_active_ms: AtomicI64,
}

impl PreviewSession {
    pub fn new(global: &GlobalConfig, config: ChatbotConfig) -> Self {
        let conversation =
            Conversation::with_settings(global.completion.settings.clone(), &config);
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            config: RwLock::new(config),
            conversation: Mutex::new(conversation),
            cancel: CancellationToken::new(),
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }
}

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub global_config: Arc<GlobalConfig>,
    pub sessions: Arc<DashMap<Uuid, Arc<PreviewSession>>>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load `config.toml`, build the provider.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let global_config = load_global_config(&data_dir).await;
        let provider = GroqProvider::from_config(&global_config.completion)?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            endpoint = %global_config.completion.settings.endpoint,
            model = %global_config.completion.settings.model,
            "Application state initialized"
        );

        Ok(Self::with_provider(
            BoxCompletionProvider::new(provider),
            global_config,
            data_dir,
        ))
    }

    /// Build state around an explicit provider.
    pub fn with_provider(
        provider: BoxCompletionProvider,
        global_config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            engine: Arc::new(ConversationEngine::new(provider)),
            global_config: Arc::new(global_config),
            sessions: Arc::new(DashMap::new()),
            data_dir,
        }
    }

    /// Start a preview session for `config` and register it.
    pub fn open_session(&self, config: ChatbotConfig) -> Arc<PreviewSession> {
        let session = Arc::new(PreviewSession::new(&self.global_config, config));
        self.sessions.insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, "Preview session opened");
        session
    }

    /// Look up a session, marking it as used.
    pub fn session(&self, id: &Uuid) -> Option<Arc<PreviewSession>> {
        let session = self.sessions.get(id).map(|entry| entry.value().clone())?;
        session.touch();
        Some(session)
    }

    /// Remove a session, cancelling any outstanding completion call.
    pub async fn close_session(&self, id: &Uuid) -> Option<Arc<PreviewSession>> {
        let (_, session) = self.sessions.remove(id)?;
        session.cancel.cancel();
        session.conversation.lock().await.close();
        tracing::info!(session_id = %id, "Preview session closed");
        Some(session)
    }

    /// Close every session last used before `cutoff`, skipping those with a
    /// turn in flight. Returns how many were closed.
    pub async fn sweep_idle_sessions(&self, cutoff: DateTime<Utc>) -> usize {
        let idle: Vec<Arc<PreviewSession>> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().last_active() < cutoff)
            .map(|entry| entry.value().clone())
            .collect();

        let mut closed = 0;
        for session in idle {
            if session.conversation.lock().await.is_in_flight() {
                continue;
            }
            if self.close_session(&session.id).await.is_some() {
                closed += 1;
            }
        }
        closed
    }

    /// Start the periodic idle-session sweep. Returns `None` when
    /// `server.session_idle_secs` is 0.
    pub fn spawn_session_sweeper(&self, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        let server = &self.global_config.server;
        if server.session_idle_secs == 0 {
            return None;
        }
        let max_idle = match TimeDelta::from_std(Duration::from_secs(server.session_idle_secs)) {
            Ok(max_idle) => max_idle,
            Err(err) => {
                tracing::warn!(
                    session_idle_secs = server.session_idle_secs,
                    "Idle-session sweep disabled: {err}"
                );
                return None;
            }
        };
        let period = Duration::from_secs(server.sweep_interval_secs.max(1));

        let state = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
                            continue;
                        };
                        let closed = state.sweep_idle_sessions(cutoff).await;
                        if closed > 0 {
                            tracing::info!(
                                closed,
                                remaining = state.sessions.len(),
                                "Idle preview sessions swept"
                            );
                        }
                    }
                }
            }
        }))
    }
}
