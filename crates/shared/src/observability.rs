//! # Observability 基盤
//!
//! ログ出力の初期化と、サービス全体を包むルートスパンを提供する。
//!
//! | 環境変数 | 効果 |
//! |----------|------|
//! | `RUST_LOG` | ログレベルのフィルタ（未設定時は [`DEFAULT_LOG_FILTER`]） |
//! | `LOG_FORMAT` | `json` または `pretty` |

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,todo=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（本番向け）
    Json,
    /// 人間向けのテキスト（開発向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値から形式を決める
    ///
    /// 未設定なら [`Pretty`](LogFormat::Pretty)。未知の値も Pretty に倒すが、
    /// subscriber はまだ無いので警告は stderr に直接書く。
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            None => Self::default(),
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            Some(other) => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールドに入る名前
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        let log_format = std::env::var("LOG_FORMAT").ok();
        Self::new(service_name, LogFormat::from_value(log_format.as_deref()))
    }
}

#[cfg(feature = "observability")]
mod subscriber {
    use tracing::Subscriber;
    use tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::MakeWriter,
        layer::SubscriberExt,
        registry::LookupSpan,
        util::SubscriberInitExt,
    };

    use super::{DEFAULT_LOG_FILTER, LogFormat, TracingConfig};

    impl TracingConfig {
        /// サービス名を `service` フィールドに持つルートスパン
        ///
        /// JSON 形式ではこのスパンに入っている間のイベントすべてに
        /// `"span": {"service": ..., "name": "app"}` が付く。
        pub fn service_span(&self) -> tracing::Span {
            tracing::info_span!("app", service = %self.service_name)
        }

        /// 指定した出力先に書き出す fmt レイヤー
        pub fn fmt_layer<S, W>(&self, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
        where
            S: Subscriber + for<'a> LookupSpan<'a>,
            W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
        {
            match self.log_format {
                LogFormat::Json => tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(writer)
                    .boxed(),
                LogFormat::Pretty => tracing_subscriber::fmt::layer().with_writer(writer).boxed(),
            }
        }
    }

    /// グローバル subscriber を登録し、サービスのルートスパンを返す
    ///
    /// 呼び出し側は返り値を `entered()` してプロセス終了まで保持する。
    /// `ErrorLayer` も登録するので、インフラ層のエラーは発生時点の SpanTrace を持つ。
    pub fn init_tracing(config: &TracingConfig) -> tracing::Span {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(config.fmt_layer(std::io::stdout))
            .with(tracing_error::ErrorLayer::default())
            .init();

        config.service_span()
    }

}

#[cfg(feature = "observability")]
pub use subscriber::init_tracing;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::未設定(None, LogFormat::Pretty)]
    #[case::json(Some("json"), LogFormat::Json)]
    #[case::pretty(Some("pretty"), LogFormat::Pretty)]
    #[case::未知の値(Some("unknown"), LogFormat::Pretty)]
    #[case::空文字(Some(""), LogFormat::Pretty)]
    #[case::大文字は区別する(Some("JSON"), LogFormat::Pretty)]
    fn test_log_formatの値から出力形式を決める(
        #[case] value: Option<&str>,
        #[case] expected: LogFormat,
    ) {
        assert_eq!(LogFormat::from_value(value), expected);
    }
}
