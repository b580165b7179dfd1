use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use ethtrace_host::adapters::HandlerAdapter;
use ethtrace_host::{DriveOptions, ErrorPolicy, TraversalReport, process_block};
use ethtrace_store::BlockHeight;
use ethtrace_traces::{Trace, TraceContext};
use serde_json::json;
use tracing::info;

use crate::opts::{Session, StoreOpts};

const LOG_HANDLER: &str = "handler.log_trace";
const SELECTORS_HANDLER: &str = "handler.call_selectors";

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Block number
    pub block: u64,

    /// Handler run for each trace
    #[arg(long, value_enum, default_value_t = HandlerChoice::Log)]
    pub handler: HandlerChoice,

    /// Keep going after a handler fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Stop after this many traces
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerChoice {
    /// Print each trace as JSON
    Log,
    /// Print the 4-byte call selector of every action
    Selectors,
}

impl HandlerChoice {
    fn kind(self) -> &'static str {
        match self {
            HandlerChoice::Log => LOG_HANDLER,
            HandlerChoice::Selectors => SELECTORS_HANDLER,
        }
    }
}

pub async fn cmd_process(opts: &StoreOpts, args: &ProcessArgs) -> Result<()> {
    let mut session = opts.open()?;
    session.runtime.register(Box::new(HandlerAdapter::new(
        LOG_HANDLER,
        |_ctx: Arc<TraceContext>, trace: Trace| async move {
            println!("{}", serde_json::to_string(&trace)?);
            Ok::<_, anyhow::Error>(trace.actions.len())
        },
    )));
    session.runtime.register(Box::new(HandlerAdapter::new(
        SELECTORS_HANDLER,
        |_ctx: Arc<TraceContext>, trace: Trace| async move {
            let selectors = call_selectors(&trace)?;
            println!(
                "{}",
                json!({ "transactionHash": trace.transaction_hash, "selectors": selectors })
            );
            Ok::<_, anyhow::Error>(selectors.len())
        },
    )));

    let outcome = drive(&session, args).await;
    let report = session.finish(outcome)?;

    if let Some(first) = report.failures.first() {
        bail!("{} handler invocation(s) failed; first: {first}", report.failures.len());
    }
    Ok(())
}

async fn drive(session: &Session, args: &ProcessArgs) -> Result<TraversalReport> {
    let options = DriveOptions {
        on_error: if args.continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Halt
        },
        max_steps: args.limit,
    };
    let report = process_block(
        &session.runtime,
        session.context.clone(),
        BlockHeight(args.block),
        args.handler.kind(),
        options,
    )
    .await?;
    info!(
        block = args.block,
        steps = report.steps,
        failures = report.failures.len(),
        halted = report.halted,
        "processed block"
    );
    Ok(report)
}

/// First four bytes of each action's call data. Actions without call data yield `None`.
fn call_selectors(trace: &Trace) -> Result<Vec<Option<String>>> {
    trace
        .actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let Some(input) = action.input.as_deref() else {
                return Ok(None);
            };
            let digits = input.strip_prefix("0x").unwrap_or(input);
            let bytes = hex::decode(digits)
                .with_context(|| format!("action {index} of {} has non-hex input", trace.transaction_hash))?;
            Ok(bytes.get(..4).map(|selector| format!("0x{}", hex::encode(selector))))
        })
        .collect()
}
