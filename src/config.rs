pub mod blogger;
pub mod log;

use serde::Deserialize;
use std::env;

/// 환경 변수로 설정을 덮어쓸 때 사용하는 접두어 (예: `BLOGGER__BLOGGER__KEY`)
const ENV_PREFIX: &'static str = "BLOGGER";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    blogger: blogger::Config,
    logger: Option<log::Config>,
}

impl AppConfig {
    pub fn blogger(&self) -> &blogger::Config {
        &self.blogger
    }

    pub fn logger(&self) -> Option<&log::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `config/{RUN_MODE}.json` 파일과 `BLOGGER__` 접두어의 환경 변수로 설정을 읽는다.
/// 설정 파일이 없으면 환경 변수만 사용한다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    load_config_from(&format!("config/{}.json", env))
}

pub fn load_config_from(path: &str) -> Result<AppConfig, config::ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    config.try_deserialize()
}
