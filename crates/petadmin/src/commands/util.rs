//! Shared helpers for command handlers.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use petadmin_core::{CoreError, EntityFacade, PhotoUpload, StoreHook};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Read a `--photo` argument into an upload.
pub fn read_photo(path: Option<&Path>) -> Result<Option<PhotoUpload>, CliError> {
    path.map(PhotoUpload::from_path)
        .transpose()
        .map_err(CliError::from)
}

/// Print a status line to stderr unless `--quiet`.
pub fn status(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

/// Run `fut` behind a stderr spinner. Hidden when quiet or not a terminal.
pub async fn with_spinner<T>(global: &GlobalOpts, message: &str, fut: impl Future<Output = T>) -> T {
    let spinner = if global.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Surface the store's error message, if the last operation set one.
pub fn check_store<F: EntityFacade>(hook: &StoreHook<F>) -> Result<(), CliError> {
    match hook.state().error.clone() {
        Some(message) => Err(CliError::Backend { message }),
        None => Ok(()),
    }
}

/// Map a failed store write, preferring the message the store recorded.
pub fn write_error<F: EntityFacade>(hook: &StoreHook<F>, err: CoreError) -> CliError {
    match err {
        CoreError::Api { .. } | CoreError::Internal(_) => match hook.state().error.clone() {
            Some(message) => CliError::Backend { message },
            None => err.into(),
        },
        other => other.into(),
    }
}

/// Fetch the records a list command asks for, driving the store through
/// its search pipeline and pagination.
pub async fn collect_list<F: EntityFacade>(
    hook: &StoreHook<F>,
    args: &ListArgs,
) -> Result<Vec<F::Summary>, CliError> {
    let default_size = hook.store().options().page_size;
    let size = args.limit.unwrap_or(default_size);
    if size == 0 {
        return Err(CliError::Validation {
            field: "limit".into(),
            reason: "must be at least 1".into(),
        });
    }

    match args.search.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(term) => {
            hook.search(term);
            hook.store().search_settled().await;
            check_store(hook)?;
            // The pipeline fetches page 0 at the store's page size.
            if args.page != 0 || size != default_size {
                hook.load_page(args.page, size).await;
            }
        }
        None => hook.load_page(args.page, size).await,
    }
    check_store(hook)?;

    let mut items = hook.state().items.clone();
    if args.all {
        while hook.next_page().await {
            check_store(hook)?;
            items.extend(hook.state().items.iter().cloned());
        }
    }
    Ok(items)
}

/// Load a record's detail view into the store's selection.
pub async fn fetch_detail<F: EntityFacade>(
    hook: &StoreHook<F>,
    id: u64,
) -> Result<F::Detail, CliError> {
    hook.load_detail(id).await;
    check_store(hook)?;
    hook.state().selected.clone().ok_or_else(|| CliError::NotFound {
        resource_type: F::KIND.to_string(),
        identifier: id.to_string(),
    })
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
