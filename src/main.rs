//! faqbot 命令行入口
//!
//! 初始化日志、加载配置、构建对话引擎，然后逐行读取 stdin 与固定会话对话；输入 exit 结束。

use std::path::PathBuf;

use anyhow::Context;
use faqbot::config::load_config;
use faqbot::ChatbotBuilder;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// `--config <path>` 指定额外的配置文件
fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    faqbot::observability::init();

    let cfg = load_config(config_path_from_args()).context("Failed to load config")?;
    let user_id = cfg.app.user_id.clone();
    let name = cfg.app.name.clone();

    let engine = ChatbotBuilder::new(cfg)
        .build()
        .await
        .context("Failed to build chatbot")?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("🤖 {} Ready! Type 'exit' to quit the chat.\n\n", name).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            // stdin 关闭与 exit 同样处理
            let bye = engine.end_chat(&user_id).await;
            stdout.write_all(format!("\n{}\n", bye).as_bytes()).await?;
            break;
        };

        if line.trim().eq_ignore_ascii_case("exit") {
            let bye = engine.end_chat(&user_id).await;
            stdout.write_all(format!("{}\n", bye).as_bytes()).await?;
            break;
        }

        let reply = engine.respond(&user_id, &line).await;
        stdout
            .write_all(format!("Bot: {}\n{}\n", reply, "-".repeat(50)).as_bytes())
            .await?;
    }

    stdout.flush().await?;
    Ok(())
}
