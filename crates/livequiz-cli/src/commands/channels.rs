//! Channel name lookup

use anyhow::{Context, Result};
use clap::Args;
use livequiz_core::{AccessKey, SessionChannels};

/// Print the three channels a session publishes and listens on
#[derive(Args)]
pub struct ChannelsCommand {
    /// Session access key (16 lowercase hex characters)
    pub access_key: String,

    /// Also print presence channel names
    #[arg(long)]
    pub presence: bool,
}

/// Channel lines for `cmd`, in server, client, chat order
pub fn channel_lines(cmd: &ChannelsCommand) -> Result<Vec<String>> {
    let key: AccessKey = cmd
        .access_key
        .parse()
        .with_context(|| format!("invalid access key {:?}", cmd.access_key))?;

    let mut lines = Vec::new();
    for (kind, channel) in SessionChannels::for_key(&key).iter() {
        lines.push(format!("{kind}\t{channel}"));
        if cmd.presence {
            lines.push(format!("{kind}\t{}", channel.presence()));
        }
    }
    Ok(lines)
}

/// Handle channels command execution
pub fn handle_channels_command(cmd: &ChannelsCommand) -> Result<()> {
    for line in channel_lines(cmd)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_three_channels() {
        let cmd = ChannelsCommand {
            access_key: "0123456789abcdef".into(),
            presence: false,
        };
        assert_eq!(
            channel_lines(&cmd).unwrap(),
            vec![
                "server\t0123456789abcdef-server",
                "client\t0123456789abcdef-client",
                "chat\t0123456789abcdef-chat",
            ]
        );
    }

    #[test]
    fn presence_lines_follow_each_channel() {
        let cmd = ChannelsCommand {
            access_key: "0123456789abcdef".into(),
            presence: true,
        };
        let lines = channel_lines(&cmd).unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "server\t0123456789abcdef-server-pnpres");
    }

    #[test]
    fn rejects_malformed_keys() {
        let cmd = ChannelsCommand {
            access_key: "ABC".into(),
            presence: false,
        };
        assert!(channel_lines(&cmd).is_err());
    }
}
