use once_cell::sync::Lazy;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use tracing_appender::rolling;

static START: Once = Once::new();
static _GUARD: Lazy<std::sync::Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> = Lazy::new(|| std::sync::Mutex::new(None));

/// テスト環境の初期化: dotenv と tracing (stderr + ファイル)。何度呼んでもよい。
pub fn init() {
    START.call_once(|| {
        let _ = dotenvy::dotenv();
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info,roast=debug"))
            .expect("env filter");

        // アプリ本体のログとは別ファイル
        let file_appender = rolling::daily("logs", "core_tests.log");
        let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
        *_GUARD.lock().unwrap() = Some(guard);

        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_writer(std::io::stderr);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(file_nb);

        // 同じプロセスで既に購読者がいれば何もしない
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init();

        tracing::info!(target = "test_init", "core test tracing initialized");
    });
}

/// 応答を順番に返す偽バックエンドで使う台本
#[allow(dead_code)]
pub mod scripted {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use color_eyre::{eyre::eyre, Result};
    use pokeroast_core::roast::{ChatBackend, RoastPrompt};

    /// `Ok(text)` は応答、`Err(msg)` は通信エラーを表す
    pub struct ScriptedBackend {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> Self {
            let replies = replies
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            Self { replies: Mutex::new(replies), calls: Mutex::new(Vec::new()) }
        }

        /// 常に同じ応答
        pub fn always(reply: &str, times: usize) -> Self {
            Self::new(vec![Ok(reply); times])
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, model: &str, _prompt: &RoastPrompt) -> Result<String> {
            self.calls.lock().unwrap().push(model.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(msg)) => Err(eyre!(msg)),
                None => Err(eyre!("script exhausted")),
            }
        }
    }
}
