use anyhow::Result;
use clap::Args;
use ethtrace_host::fetch_block;
use ethtrace_store::BlockHeight;

use crate::opts::{Session, StoreOpts};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Block number
    pub block: u64,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

pub async fn cmd_show(opts: &StoreOpts, args: &ShowArgs) -> Result<()> {
    let session = opts.open()?;
    let outcome = render(&session, args).await;
    session.finish(outcome)
}

async fn render(session: &Session, args: &ShowArgs) -> Result<()> {
    let traces = fetch_block(&session.runtime, session.context.clone(), BlockHeight(args.block)).await?;
    let out = if args.pretty {
        serde_json::to_string_pretty(&traces)?
    } else {
        serde_json::to_string(&traces)?
    };
    println!("{out}");
    Ok(())
}
