//! The command forest and its dispatch.
//!
//! Built fresh on every invocation: one anonymous root, one child per
//! command group, verbs below that. A resolved node carries an [`Action`];
//! group nodes and the root carry [`Action::Help`], which is also what an
//! unresolvable path degrades to — unknown subcommands print the nearest
//! ancestor's usage instead of failing.

use std::time::Duration;

use lumen_ipc::{
    command_tree::CommandNode,
    proto::{CommandCode, ReplyStatus, Request},
    transport::{IpcSession, default_socket_path},
};
use tracing::{debug, info};

use crate::{
    cli::Args,
    error::{BadVolumeSnafu, CtlError, RejectedSnafu, VolumeAritySnafu},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print usage for this node's subtree and exit 0.
    Help,
    /// Send the bare request for this code.
    Emit(CommandCode),
    /// Parse one `0.0..=1.0` argument and send a volume-set request.
    SetVolume,
}

fn node(name: &'static str, action: Action) -> CommandNode<Action> {
    // names are static literals, never empty
    CommandNode::new(name, action).expect("static command name")
}

fn verb(name: &'static str, code: CommandCode) -> CommandNode<Action> {
    node(name, Action::Emit(code))
}

fn toggle_group(
    name: &'static str,
    show: CommandCode,
    hide: CommandCode,
    toggle: CommandCode,
) -> CommandNode<Action> {
    node(name, Action::Help)
        .with_child(verb("show", show))
        .with_child(verb("hide", hide))
        .with_child(verb("toggle", toggle))
}

/// The full command forest, one registration per daemon operation.
pub fn command_tree() -> CommandNode<Action> {
    use CommandCode as C;

    CommandNode::root(Action::Help)
        .with_child(
            node("message-tray", Action::Help).with_child(verb("open", C::MessageTrayOpen)),
        )
        .with_child(
            node("volume", Action::Help)
                .with_child(verb("up", C::VolumeUp))
                .with_child(verb("down", C::VolumeDown))
                .with_child(node("set", Action::SetVolume))
                .with_child(verb("mute", C::VolumeMute)),
        )
        .with_child(
            node("brightness", Action::Help)
                .with_child(verb("up", C::BrightnessUp))
                .with_child(verb("down", C::BrightnessDown))
                .with_child(verb("keyboard-up", C::KeyboardBrightnessUp))
                .with_child(verb("keyboard-down", C::KeyboardBrightnessDown)),
        )
        .with_child(
            node("theme", Action::Help)
                .with_child(verb("dark", C::ThemeDark))
                .with_child(verb("light", C::ThemeLight))
                .with_child(verb("dump-dark", C::ThemeDumpDark))
                .with_child(verb("dump-light", C::ThemeDumpLight)),
        )
        .with_child(toggle_group(
            "activities",
            C::ActivitiesShow,
            C::ActivitiesHide,
            C::ActivitiesToggle,
        ))
        .with_child(toggle_group(
            "app-switcher",
            C::AppSwitcherShow,
            C::AppSwitcherHide,
            C::AppSwitcherToggle,
        ))
        .with_child(toggle_group(
            "workspace-switcher",
            C::WorkspaceSwitcherShow,
            C::WorkspaceSwitcherHide,
            C::WorkspaceSwitcherToggle,
        ))
        .with_child(toggle_group(
            "output-switcher",
            C::OutputSwitcherShow,
            C::OutputSwitcherHide,
            C::OutputSwitcherToggle,
        ))
        .with_child(toggle_group(
            "rename-switcher",
            C::RenameSwitcherShow,
            C::RenameSwitcherHide,
            C::RenameSwitcherToggle,
        ))
        .with_child(toggle_group(
            "workspace-app-switcher",
            C::WorkspaceAppSwitcherShow,
            C::WorkspaceAppSwitcherHide,
            C::WorkspaceAppSwitcherToggle,
        ))
}

/// Resolve the command words and run the resolved action.
pub async fn run(args: &Args) -> Result<(), CtlError> {
    let root = command_tree();
    let resolved = root.resolve(&args.command);

    match *resolved.node.action() {
        Action::Help => {
            print_usage(resolved.node, &args.command[..resolved.depth]);
            Ok(())
        }
        Action::Emit(code) => {
            if !resolved.trailing.is_empty() {
                debug!(trailing = ?resolved.trailing, "ignoring trailing arguments");
            }
            let request = Request::bare(code)?;
            deliver(args, request).await
        }
        Action::SetVolume => {
            let request = parse_volume_set(resolved.trailing)?;
            deliver(args, request).await
        }
    }
}

fn parse_volume_set(trailing: &[String]) -> Result<Request, CtlError> {
    let [input] = trailing else {
        return VolumeAritySnafu {
            got: trailing.len(),
        }
        .fail();
    };
    let level: f32 = input
        .parse()
        .map_err(|_| BadVolumeSnafu { input: input.clone() }.build())?;
    Request::volume_set(level).map_err(|_| BadVolumeSnafu { input: input.clone() }.build())
}

async fn deliver(args: &Args, request: Request) -> Result<(), CtlError> {
    let path = match &args.socket {
        Some(path) => path.clone(),
        None => default_socket_path()?,
    };
    let session =
        IpcSession::connect(path)?.with_reply_timeout(Duration::from_secs(args.timeout));
    let reply = session.roundtrip(&request).await?;
    match reply.status {
        ReplyStatus::Ok => {
            info!(code = ?request.code(), "acknowledged");
            Ok(())
        }
        status => RejectedSnafu { status }.fail(),
    }
}

/// One usage line per verb under `from`, joined with its matched path.
fn print_usage(from: &CommandNode<Action>, matched: &[String]) {
    let mut prefix = String::from("lumenctl");
    for word in matched {
        prefix.push(' ');
        prefix.push_str(word);
    }
    if from.children().is_empty() {
        println!("usage: {prefix}");
        return;
    }
    println!("usage: {prefix} {}", verbs_summary(from));
    if matched.is_empty() {
        println!("\ncommands:");
        for group in from.children() {
            println!("  {} {}", group.name(), verbs_summary(group));
        }
    }
}

fn verbs_summary(parent: &CommandNode<Action>) -> String {
    let labels: Vec<String> = parent
        .children()
        .iter()
        .map(|child| match child.action() {
            Action::SetVolume => format!("{} <0.0-1.0>", child.name()),
            _ => child.name().to_string(),
        })
        .collect();
    format!("{{{}}}", labels.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn volume_set_resolves_with_its_argument() {
        let tree = command_tree();
        let argv = words(&["volume", "set", "0.7"]);
        let res = tree.resolve(&argv);
        assert_eq!(*res.node.action(), Action::SetVolume);
        assert_eq!(res.trailing, ["0.7".to_string()]);
    }

    #[test]
    fn every_emit_verb_resolves_to_its_code() {
        let tree = command_tree();
        for (path, code) in [
            (&["message-tray", "open"][..], CommandCode::MessageTrayOpen),
            (&["volume", "mute"], CommandCode::VolumeMute),
            (&["brightness", "keyboard-up"], CommandCode::KeyboardBrightnessUp),
            (&["theme", "dump-light"], CommandCode::ThemeDumpLight),
            (&["activities", "toggle"], CommandCode::ActivitiesToggle),
            (&["app-switcher", "show"], CommandCode::AppSwitcherShow),
            (&["workspace-switcher", "hide"], CommandCode::WorkspaceSwitcherHide),
            (&["output-switcher", "toggle"], CommandCode::OutputSwitcherToggle),
            (&["rename-switcher", "show"], CommandCode::RenameSwitcherShow),
            (
                &["workspace-app-switcher", "toggle"],
                CommandCode::WorkspaceAppSwitcherToggle,
            ),
        ] {
            let argv = words(path);
            let res = tree.resolve(&argv);
            assert_eq!(*res.node.action(), Action::Emit(code), "path {path:?}");
            assert!(res.trailing.is_empty());
        }
    }

    #[test]
    fn unknown_subcommand_degrades_to_group_help() {
        let tree = command_tree();
        let argv = words(&["volume", "wobble"]);
        let res = tree.resolve(&argv);
        assert_eq!(*res.node.action(), Action::Help);
        assert_eq!(res.node.name(), "volume");
        assert_eq!(res.trailing, ["wobble".to_string()]);
    }

    #[test]
    fn empty_input_resolves_to_anonymous_root() {
        let tree = command_tree();
        let res = tree.resolve(&[]);
        assert_eq!(*res.node.action(), Action::Help);
        assert!(res.node.name().is_empty());
    }

    #[test]
    fn volume_validation_rejects_bad_levels_locally() {
        assert!(matches!(
            parse_volume_set(&words(&["1.5"])),
            Err(CtlError::BadVolume { .. })
        ));
        assert!(matches!(
            parse_volume_set(&words(&["loud"])),
            Err(CtlError::BadVolume { .. })
        ));
        assert!(matches!(
            parse_volume_set(&words(&[])),
            Err(CtlError::VolumeArity { got: 0 })
        ));
        assert!(matches!(
            parse_volume_set(&words(&["0.5", "0.6"])),
            Err(CtlError::VolumeArity { got: 2 })
        ));
        assert_eq!(
            parse_volume_set(&words(&["0.7"])).unwrap(),
            Request::volume_set(0.7).unwrap()
        );
    }

    #[test]
    fn group_usage_summarizes_verbs_in_order() {
        let tree = command_tree();
        let input = words(&["volume"]);
        let res = tree.resolve(&input);
        assert_eq!(
            verbs_summary(res.node),
            "{up|down|set <0.0-1.0>|mute}"
        );
    }
}
