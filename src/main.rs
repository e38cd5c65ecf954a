use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use issue_triage::client::{self, Invocation, Outcome};
use issue_triage::components::comment::ThreadRandom;
use issue_triage::infrastructure::gh::RealGh;

#[derive(Parser)]
#[command(
    name = "issue-triage",
    version,
    about = "이슈/PR 제목·본문 품질 검사 후 라벨·댓글·리액션으로 응답"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 이벤트를 판정하고 라벨/댓글/리액션을 반영
    Run(EventArgs),
    /// 판정만 하고 결과를 JSON으로 출력 (쓰기 호출 없음)
    Check(EventArgs),
    /// 설정 관리
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 머지된 설정 표시 (기본값 + 로컬 파일)
    Show {
        /// 기본값 위에 머지할 로컬 YAML 파일
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct EventArgs {
    /// 웹훅 이벤트 이름 (issues, pull_request, pull_request_target)
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,
    /// 이벤트 페이로드 JSON 파일
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,
    /// 대상 레포 (owner/repo)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,
    /// 레포 안의 설정 파일 경로
    #[arg(long, env = "CONFIG_FILE")]
    config_file: Option<String>,
    /// GitHub API 토큰
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,
    /// GitHub Enterprise 호스트
    #[arg(long, env = "GH_HOST")]
    gh_host: Option<String>,
}

impl EventArgs {
    fn invocation(&self) -> Invocation<'_> {
        Invocation {
            event_name: &self.event_name,
            event_path: &self.event_path,
            repository: &self.repository,
            config_file: self.config_file.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {e}");
    }

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            println!("{}", client::error_annotation(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("issue_triage=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let gh = RealGh::new(&args.token, args.gh_host.clone());
            let outcome = client::handle_event(&gh, &ThreadRandom, &args.invocation(), true).await?;
            if !matches!(outcome, Outcome::Evaluated(_)) {
                tracing::info!("{}", client::format_outcome(&outcome)?);
            }
        }
        Commands::Check(args) => {
            let gh = RealGh::new(&args.token, args.gh_host.clone());
            let outcome =
                client::handle_event(&gh, &ThreadRandom, &args.invocation(), false).await?;
            println!("{}", client::format_outcome(&outcome)?);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { file } => {
                print!("{}", client::config_show(file.as_deref())?);
            }
        },
    }

    Ok(())
}
