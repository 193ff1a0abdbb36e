mod args;
mod config;
mod entry;
mod error;
mod http;
mod loadtest;
mod logger;
mod report;
mod shutdown;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
