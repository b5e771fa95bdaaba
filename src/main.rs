use blogger_api::config;
use blogger_api::Client;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "blogger", about = "Blogger API v3 조회 도구")]
struct Cli {
    /// 블로그 ID, 지정하지 않으면 요청 경로의 블로그 ID가 비어 있게 된다.
    #[arg(long, global = true)]
    blog_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// URL로 블로그 정보를 조회한다. URL을 생략하면 설정의 기본 URL을 사용한다.
    Blog { url: Option<String> },
    /// 게시글 목록
    Posts,
    /// ID로 게시글 조회
    Post { post_id: String },
    /// 경로로 게시글 조회
    PostByPath { path: String },
    /// 키워드로 게시글 검색
    Search {
        #[arg(default_value = "")]
        keyword: String,
    },
    /// 페이지 목록
    Pages,
    /// ID로 페이지 조회
    Page { page_id: String },
}

fn main() -> ExitCode {
    config::load_dotenv();
    let cli = Cli::parse();

    let app_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cannot loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match app_config.logger() {
        Some(logger) => match config::log::set_global_logging_config(logger) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            config::log::set_stderr_logging();
            None
        }
    };

    let client = match Client::from_config(app_config.blogger()) {
        Ok(client) => client.set_blog(cli.blog_id.unwrap_or_default()),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let printed = match cli.command {
        Command::Blog { url } => match client.blog(url.as_deref()) {
            Ok(fetched) => print(&fetched.value),
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        Command::Posts => print(&client.posts(None).value),
        Command::Post { post_id } => print(&client.post_by_id(&post_id, None).value),
        Command::PostByPath { path } => print(&client.post_by_path(&path, None).value),
        Command::Search { keyword } => print(&client.search(&keyword, None).value),
        Command::Pages => print(&client.pages(None).value),
        Command::Page { page_id } => print(&client.page(&page_id, None).value),
    };

    match printed {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("응답 출력 실패 => {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
