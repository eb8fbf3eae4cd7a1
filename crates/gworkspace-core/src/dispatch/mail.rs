//! Mail domain: `gmail <command> [args...]`. Every command is read-only.

use std::ffi::OsString;
use std::future::Future;

use clap::{Parser, Subcommand};
use tracing::info;

use super::{parse_args, Capability, Invocation, Output, DEFAULT_COUNT, MAX_COUNT};
use crate::backend::{MailBackend, MessageFormat};
use crate::common::AppResult;
use crate::fanout::fan_out;
use crate::normalize::mail::{label, message_full, message_summary, thread_summary, LabelRef};
use crate::normalize::text;

#[derive(Debug, Parser)]
#[command(name = "gmail", version, about = "Read Gmail messages, threads and labels")]
pub struct MailCli {
    #[command(subcommand)]
    pub command: MailCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MailCommand {
    /// Most recent messages, optionally narrowed by a Gmail query
    List {
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
        #[arg(default_value = "")]
        query: String,
    },
    /// One message with its decoded body
    Read {
        /// Message id
        id: String,
    },
    /// Messages matching a Gmail query ("from:ana is:unread")
    Search {
        query: String,
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
    },
    /// All labels
    Labels,
    /// Conversation threads matching a Gmail query
    Threads {
        query: String,
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
    },
}

impl MailCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Read { .. } => "read",
            Self::Search { .. } => "search",
            Self::Labels => "labels",
            Self::Threads { .. } => "threads",
        }
    }

    pub fn capability(&self) -> Capability {
        Capability::Read
    }
}

/// Parse `args`, connect only if a command parsed, then dispatch it.
pub async fn execute<I, T, B, C, Fut>(args: I, connect: C) -> AppResult<Output>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: MailBackend,
    C: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<B>>,
{
    let command = match parse_args::<MailCli, _, _>(args)? {
        Invocation::Run(cli) => cli.command,
        Invocation::Help(text) => return Ok(Output::Text(text)),
    };

    info!(command = command.name(), capability = %command.capability(), "Dispatching mail command");
    let backend = connect().await?;
    dispatch(command, &backend).await
}

pub async fn dispatch<B: MailBackend>(command: MailCommand, backend: &B) -> AppResult<Output> {
    match command {
        MailCommand::List { count, query } => message_summaries(backend, &query, count).await,
        MailCommand::Search { query, count } => message_summaries(backend, &query, count).await,
        MailCommand::Read { id } => {
            let raw = backend.get_message(&id, MessageFormat::Full).await?;
            Output::json(&message_full(&raw))
        }
        MailCommand::Labels => {
            let labels: Vec<LabelRef> = backend.list_labels().await?.iter().map(label).collect();
            Output::list(&labels, "No labels found.")
        }
        MailCommand::Threads { query, count } => {
            let refs = backend.list_threads(&query, count as usize).await?;
            let ids = refs.iter().map(|r| text(r, "id")).collect();

            let threads = fan_out(ids, String::clone, |id| async move {
                backend.get_thread(&id).await
            })
            .await?;

            let summaries: Vec<_> = threads.iter().map(thread_summary).collect();
            Output::list(&summaries, "No threads found.")
        }
    }
}

async fn message_summaries<B: MailBackend>(backend: &B, query: &str, count: u32) -> AppResult<Output> {
    let refs = backend.list_messages(query, count as usize).await?;
    let ids = refs.iter().map(|r| text(r, "id")).collect();

    let messages = fan_out(ids, String::clone, |id| async move {
        backend.get_message(&id, MessageFormat::Metadata).await
    })
    .await?;

    let summaries: Vec<_> = messages.iter().map(message_summary).collect();
    Output::list(&summaries, "No messages found.")
}
