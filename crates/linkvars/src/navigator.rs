//! A navigator that reports what it would open instead of opening it.
//!
//! The CLI has no host to navigate in, so targets are written to the output
//! one per line, prefixed with the channel for addresses. Choice prompts are
//! answered from `--choose`; without it the options are listed and the
//! invocation is cancelled.

use std::io::{self, Write};

use linkvars_template::{Channel, ChoiceRequest, InvokeError, Navigator, Target};
use tracing::warn;

pub struct PrintNavigator<'w, W: Write> {
    out: &'w mut W,
    /// 1-based option picked on the command line.
    choice: Option<usize>,
    channel: Option<Channel>,
    notices: Vec<String>,
    io_error: Option<io::Error>,
}

impl<'w, W: Write> PrintNavigator<'w, W> {
    pub fn new(out: &'w mut W, choice: Option<usize>, channel: Option<Channel>) -> Self {
        Self {
            out,
            choice,
            channel,
            notices: Vec::new(),
            io_error: None,
        }
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
        if self.io_error.is_none() {
            if let Err(e) = self.out.write_fmt(format_args!("{line}\n")) {
                self.io_error = Some(e);
            }
        }
    }

    /// Surface the first write failure, if any.
    pub fn finish(self) -> io::Result<Vec<String>> {
        match self.io_error {
            Some(e) => Err(e),
            None => Ok(self.notices),
        }
    }
}

impl<W: Write> Navigator for PrintNavigator<'_, W> {
    fn open_structural(&mut self, target: &Target) {
        self.write_line(format_args!("{}", target.value));
    }

    fn open_address(&mut self, target: &Target, channel: Channel) {
        self.write_line(format_args!("[{channel}] {}", target.value));
    }

    fn choose(&mut self, request: &ChoiceRequest) -> Option<usize> {
        if let Some(n) = self.choice {
            if (1..=request.options.len()).contains(&n) {
                return Some(n - 1);
            }
            warn!(choice = n, options = request.options.len(), "choice out of range");
        }
        for (i, option) in request.options.iter().enumerate() {
            self.write_line(format_args!(
                "{}. {} ({})",
                i + 1,
                option.display,
                option.label
            ));
        }
        None
    }

    fn choose_channel(&mut self, target: &Target) -> Option<Channel> {
        match self.channel {
            Some(wanted) if target.channels.contains(&wanted) => Some(wanted),
            Some(wanted) => {
                warn!(channel = %wanted, "channel not offered for this target");
                target.channels.first().copied()
            }
            None => target.channels.first().copied(),
        }
    }

    fn notify(&mut self, error: &InvokeError) {
        self.notices.push(error.to_string());
    }
}
