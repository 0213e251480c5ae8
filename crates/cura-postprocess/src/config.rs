use crate::service::DEFAULT_ANNOTATED_SETTING;
use clap::Parser;

pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: u16 = 33701;

#[derive(Parser, Debug, Clone)]
#[command(
    name = crate::metadata::PLUGIN_NAME,
    bin_name = "curaengine_plugin_postprocess",
    version = crate::metadata::PLUGIN_VERSION,
    about = "Annotates CuraEngine g-code layers through the postprocess plugin slot"
)]
pub struct Args {
    /// The IP address to listen on.
    #[arg(long, visible_alias = "ip", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// The port number to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Setting whose value is written into every layer annotation.
    #[arg(long, default_value = DEFAULT_ANNOTATED_SETTING)]
    pub annotate_setting: String,
}

impl Args {
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
