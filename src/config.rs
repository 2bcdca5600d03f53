//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FAQBOT__*` 覆盖（双下划线表示嵌套，如 `FAQBOT__LLM__MODEL=qwen2.5:3b`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub company: CompanySection,
    pub llm: LlmSection,
    pub embedding: EmbeddingSection,
    pub knowledge: KnowledgeSection,
    pub retrieval: RetrievalSection,
    pub dialogue: DialogueSection,
    pub store: StoreSection,
}

/// [app] 段：应用名、CLI 会话用户、FAQ 数据文件
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    /// CLI 只服务一个固定会话
    pub user_id: String,
    pub faq_path: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "Codex FAQ Chatbot".to_string(),
            user_id: "default".to_string(),
            faq_path: PathBuf::from("faq_data.json"),
        }
    }
}

/// [company] 段：机器人代表的公司与兜底联系方式（写入生成提示词）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompanySection {
    pub name: String,
    /// 致谢语里用的简称
    pub short_name: String,
    pub phone: String,
    pub email: String,
}

impl Default for CompanySection {
    fn default() -> Self {
        Self {
            name: "CodeX Technolife Pvt. Ltd.".to_string(),
            short_name: "CodeX Technolife".to_string(),
            phone: "+91 947 456 2952".to_string(),
            email: "info@codextechnolife.com".to_string(),
        }
    }
}

/// [llm] 段：Ollama 兼容的生成端点
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            max_tokens: 400,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    /// 单次生成请求超时（秒）
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 120 }
    }
}

/// [embedding] 段：OpenAI 兼容 /embeddings 端点；未启用时使用本地哈希嵌入
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSection {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: Some("http://localhost:11434/v1".to_string()),
            model: "all-minilm".to_string(),
            api_key: None,
        }
    }
}

/// [knowledge] 段：向量索引快照路径
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeSection {
    /// 为 None 时索引只存在于内存中
    pub index_path: Option<PathBuf>,
}

impl Default for KnowledgeSection {
    fn default() -> Self {
        Self {
            index_path: Some(PathBuf::from("data/faq_index.json")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSection {
    pub top_n: usize,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

/// [dialogue] 段：FAQ 回答多少轮后推荐表单
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogueSection {
    pub nudge_threshold: u32,
}

impl Default for DialogueSection {
    fn default() -> Self {
        Self { nudge_threshold: 3 }
    }
}

/// [store] 段：表单提交的 SQLite 数据库
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub db_path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/faqbot.db"),
        }
    }
}

/// 从 config 目录加载配置，环境变量 FAQBOT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FAQBOT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        } else {
            tracing::warn!("config file {} not found, ignoring", path.display());
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FAQBOT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.user_id, "default");
        assert_eq!(cfg.llm.model, "llama3.2:3b");
        assert_eq!(cfg.llm.max_tokens, 400);
        assert_eq!(cfg.llm.timeouts.request, 120);
        assert_eq!(cfg.retrieval.top_n, 3);
        assert_eq!(cfg.dialogue.nudge_threshold, 3);
        assert!(!cfg.embedding.enabled);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        std::fs::write(
            &path,
            "[retrieval]\ntop_n = 5\n\n[company]\nname = \"Acme\"\n\n[llm.timeouts]\nrequest = 7\n",
        )
        .unwrap();

        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.retrieval.top_n, 5);
        assert_eq!(cfg.company.name, "Acme");
        assert_eq!(cfg.llm.timeouts.request, 7);
        // 未出现的键保持默认值
        assert_eq!(cfg.company.phone, "+91 947 456 2952");
        assert_eq!(cfg.dialogue.nudge_threshold, 3);
    }
}
