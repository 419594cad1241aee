use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::future::Future;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn initialize_logging(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();

    let multi = MULTI.get_or_init(MultiProgress::new);

    LogWrapper::new(multi.clone(), logger).try_init()
}

/// Runs `function` with a progress bar of length `total` attached to the shared
/// [`MultiProgress`], so log lines are printed above the bar instead of through it.
///
/// Without [`initialize_logging`] (e.g. in tests) the bar is created but never drawn.
pub async fn run_with_pb_async<'a, F, Fut, Out>(
    target: &'a str,
    task_desc: &'a str,
    total: u64,
    print_message: bool,
    function: F,
) -> Out
where
    F: FnOnce(ProgressBar) -> Fut,
    Fut: Future<Output = Out>,
{
    let start_time = Instant::now();

    let pb = match MULTI.get() {
        Some(multi) => {
            let pb = multi.add(ProgressBar::new(total));
            pb.enable_steady_tick(Duration::from_secs(1));
            pb
        }
        None => ProgressBar::hidden(),
    };
    pb.set_length(total);
    pb.set_message(format!("{}...", task_desc));
    if let Ok(style) = ProgressStyle::with_template(
        "[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }

    let out = function(pb.clone()).await;

    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(&pb);
    }
    if print_message {
        let elapsed = indicatif::HumanDuration(start_time.elapsed());
        info!(target: target, "{} finished (took {})", task_desc, elapsed);
    }

    out
}
