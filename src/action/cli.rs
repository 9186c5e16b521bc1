use std::io;
use std::path::PathBuf;
use clap::Parser;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::{default_archive_base, validate_input_path, Cli};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::models::document::is_office_file;
use crate::service::config_service::ConfigService;
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::{setup_logging, summarize};

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli)));
    let config = config_service.get_config()?;

    let result = ConversionAdapter.execute(config.clone())?;
    Ok(summarize(&result, config.max_error_details))
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let input = validate_input_path(&self.cli.input)?;
        let is_single_file = self.cli.single_file.unwrap_or_else(|| input.is_file());

        if is_single_file && !input.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("單一檔案模式需要檔案路徑：{}", input.display()),
            ));
        }
        if is_single_file && !is_office_file(input) {
            log::warn!("選取的檔案不是 Office 檔案，將不會進行轉換：{}", input.display());
        }

        Ok(AppConfig {
            input: PathBuf::from(&self.cli.input),
            is_single_file,
            archive_base: self.cli.archive_dir.clone().unwrap_or_else(default_archive_base),
            soffice: self.cli.soffice.clone(),
            no_progress: self.cli.no_progress,
            max_error_details: self.cli.max_error_details,
        })
    }
}
