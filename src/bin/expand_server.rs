//! sheet-expand API server binary
//!
//! Upload a workbook, get the expanded .xlsx back.

use clap::Parser;
use sheet_expand::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "sheet-expand-server")]
#[command(version)]
#[command(about = "sheet-expand API server - HTTP front end for spreadsheet row expansion")]
#[command(long_about = r#"
sheet-expand API server

Endpoints:
  - POST /api/v1/expand         - Expand a workbook on the server's filesystem
  - POST /api/v1/expand/upload  - Upload a workbook, download dados_expandidos.xlsx
  - POST /api/v1/labels         - Edit a STATES label list

Additional endpoints:
  - GET  /health                - Health check
  - GET  /version               - Server version info
  - GET  /                      - API documentation

Example usage:
  sheet-expand-server                            # Start on localhost:8080
  sheet-expand-server --host 0.0.0.0 --port 3000

  curl -X POST --data-binary @datas.xlsx \
    "http://localhost:8080/api/v1/expand/upload?repetitions=17&value_range=C:S" \
    -o dados_expandidos.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEET_EXPAND_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEET_EXPAND_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
