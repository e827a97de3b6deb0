/*
 * open.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Open command implementation
 */

//! Open command implementation.
//!
//! Runs the full invocation: resolve, filter ignored options, ask for a
//! choice, pick a channel, then report the navigation.

use std::io::Write;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use linkvars_template::{Channel, Environment, Outcome, follow};
use tracing::{info, warn};

use super::{GlobalArgs, LinkArgs, load_context, properties};
use crate::navigator::PrintNavigator;

/// Channel selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    Rich,
    Plain,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Rich => Channel::Rich,
            ChannelArg::Plain => Channel::Plain,
        }
    }
}

/// Arguments for the open command
#[derive(Debug)]
pub struct OpenArgs {
    pub link: LinkArgs,
    pub choose: Option<usize>,
    pub channel: Option<ChannelArg>,
    pub no_rich: bool,
}

/// Execute the open command
pub fn execute(global: &GlobalArgs, args: &OpenArgs, out: &mut impl Write) -> Result<()> {
    let context = load_context(global)?;
    let document = args.link.load_document()?;
    let environment = Environment {
        rich_available: !args.no_rich,
    };
    let invoker = context.invoker(properties(document.as_ref()), environment);

    let mut navigator = PrintNavigator::new(out, args.choose, args.channel.map(Channel::from));
    let outcome = follow(&invoker, &mut navigator, &args.link.template, args.link.kind());
    let notices = navigator.finish()?;
    for notice in &notices {
        warn!("{notice}");
    }

    match outcome {
        Outcome::Opened(target) => {
            info!(label = %target.label, "opened");
            Ok(())
        }
        Outcome::Cancelled => {
            info!("nothing opened; pass --choose N to pick an option");
            Ok(())
        }
        Outcome::Failed(error) => Err(anyhow!(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;

    fn args(fixture: &Fixture, template: &str, address: bool) -> OpenArgs {
        OpenArgs {
            link: LinkArgs {
                template: template.to_string(),
                document: Some(fixture.note()),
                address,
            },
            choose: None,
            channel: None,
            no_rich: false,
        }
    }

    fn run(fixture: &Fixture, profile: Option<&str>, args: &OpenArgs) -> Result<String> {
        let mut out = Vec::new();
        execute(&fixture.global(profile), args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_open_single_address_prefers_rich() {
        let fixture = Fixture::new();
        let args = args(&fixture, "${SERVER1}${API}", true);
        insta::assert_snapshot!(run(&fixture, None, &args).unwrap(), @"[rich] https://server1.com/api");
    }

    #[test]
    fn test_open_without_choice_lists_options() {
        let fixture = Fixture::new();
        let args = args(&fixture, "${SERVER1,,SERVER2}/status", true);
        insta::assert_snapshot!(run(&fixture, None, &args).unwrap(), @r"
        1. https://server1.com (SERVER1)
        2. https://server2.com (SERVER2)
        ");
    }

    #[test]
    fn test_open_chosen_option_respects_preference() {
        let fixture = Fixture::new();
        let mut args = args(&fixture, "${SERVER1,,SERVER2}/status", true);
        args.choose = Some(2);
        args.channel = Some(ChannelArg::Rich);
        insta::assert_snapshot!(
            run(&fixture, None, &args).unwrap(),
            @"[plain] https://server2.com/status"
        );
    }

    #[test]
    fn test_open_without_rich_environment() {
        let fixture = Fixture::new();
        let mut args = args(&fixture, "${SERVER1}", true);
        args.no_rich = true;
        insta::assert_snapshot!(run(&fixture, None, &args).unwrap(), @"[plain] https://server1.com");
    }

    #[test]
    fn test_open_skips_ignored_option() {
        let fixture = Fixture::new();
        let args = args(&fixture, "${RCLONE,,DOWNLOADS}", false);
        assert_eq!(
            run(&fixture, Some("laptop"), &args).unwrap(),
            " home me Downloads\n"
        );
    }

    #[test]
    fn test_open_fails_when_every_option_is_ignored() {
        let fixture = Fixture::new();
        let args = args(&fixture, "${RCLONE,,rclone}", false);
        let err = run(&fixture, Some("laptop"), &args).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"All options of '${RCLONE,,rclone}' are ignored on this device (RCLONE)"
        );
    }
}
