use clap::Parser;

use crate::configuration::Configuration;

#[derive(Debug, Clone, Parser)]
#[command(about = "Barbershop appointment scheduler")]
pub struct ConfigurationHandler {
    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    #[arg(long, env = "ADMIN_PASSWORD", default_value = "123")]
    admin_password: String,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "SLOT_INTERVAL_MINUTES", default_value_t = 30)]
    slot_interval_minutes: i64,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone()
    }

    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn slot_interval_minutes(&self) -> i64 {
        self.slot_interval_minutes
    }
}
