//! Conversation formatting — pure functions, no I/O.
//!
//! Builds the system instruction from the device inventory and channel
//! configuration, and reshapes raw chat history into the provider-facing
//! turn sequence.

use netrelay_core::types::{ChatTurn, Device, NetworkConfig, Sender};

use crate::provider::ChatMessage;

/// Fixed instructional template describing the two action kinds the
/// assistant may request. Device-configuration actions are executed by
/// the frontend; notifications are executed by the relay.
const ACTION_TEMPLATE: &str = "\
## Actions

You can request two kinds of actions by embedding a directive in your reply.

1. Device configuration (executed by the frontend):
<execute_action>{\"action\":\"update_device\",\"payload\":{\"serial\":\"Q2XX-XXXX-XXXX\",\"name\":\"new-name\"}}</execute_action>

2. Notification (executed by the backend):
<execute_action>{\"action\":\"send_notification\",\"payload\":{\"platform\":\"webex\",\"message\":\"Your message here\"}}</execute_action>

Embed at most one directive per reply, exactly as shown, with valid JSON \
between the markers. Only request a notification platform that is listed \
as configured above.";

/// Assemble the system instruction for one turn request.
///
/// Deterministic text assembly: device inventory (serial/name/model only),
/// the set of configured notification platforms, then the fixed action
/// template.
pub fn build_system_instruction(devices: &[Device], config: &NetworkConfig) -> String {
    let mut out = String::from(
        "You are a network operations assistant embedded in a management dashboard.\n\n",
    );

    out.push_str("## Devices\n\n");
    if devices.is_empty() {
        out.push_str("No devices are currently loaded.\n");
    } else {
        for device in devices {
            out.push_str(&format!(
                "- serial: {} | name: {} | model: {}\n",
                device.serial, device.name, device.model
            ));
        }
    }

    out.push_str("\n## Notification platforms\n\n");
    let mut any = false;
    if config.webex_webhook_url.is_some() {
        out.push_str("- webex (configured)\n");
        any = true;
    }
    if config.webhook_url.is_some() {
        out.push_str("- webhook (configured)\n");
        any = true;
    }
    if !any {
        out.push_str("No notification platforms are configured.\n");
    }

    out.push('\n');
    out.push_str(ACTION_TEMPLATE);
    out
}

/// Reshape raw history into provider-facing turns.
///
/// Drops system notices, external-channel turns, and canned introductory
/// turns (id prefix). Relative order is preserved.
pub fn format_history(history: &[ChatTurn]) -> Vec<ChatMessage> {
    history
        .iter()
        .filter(|turn| !turn.is_intro())
        .filter_map(|turn| match turn.sender {
            Sender::User => Some(ChatMessage::user(turn.text.clone())),
            Sender::Ai => Some(ChatMessage::model(turn.text.clone())),
            Sender::System | Sender::Webex => None,
        })
        .collect()
}

/// Build the full provider request for one turn.
///
/// All history except the last turn goes through `format_history`; the
/// last turn's raw text is then appended verbatim as the final operator
/// turn, even when its classification would otherwise filter it. The
/// provider must always receive the triggering message.
pub fn build_request(
    history: &[ChatTurn],
    devices: &[Device],
    config: &NetworkConfig,
) -> (String, Vec<ChatMessage>) {
    let system = build_system_instruction(devices, config);

    let (last, prior) = match history.split_last() {
        Some((last, prior)) => (Some(last), prior),
        None => (None, history),
    };

    let mut turns = format_history(prior);
    if let Some(last) = last {
        turns.push(ChatMessage::user(last.text.clone()));
    }

    (system, turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;
    use netrelay_core::types::INTRO_ID_PREFIX;

    fn turn(sender: Sender, text: &str) -> ChatTurn {
        ChatTurn::new(sender, text)
    }

    fn intro_turn(text: &str) -> ChatTurn {
        let mut t = ChatTurn::new(Sender::Ai, text);
        t.id = format!("{}welcome", INTRO_ID_PREFIX);
        t
    }

    #[test]
    fn system_instruction_lists_every_device() {
        let devices = vec![
            Device {
                serial: "Q2AB-1111-2222".into(),
                name: "core-switch".into(),
                model: "MS250".into(),
                network_id: Some("n1".into()),
            },
            Device {
                serial: "Q2CD-3333-4444".into(),
                name: "lobby-ap".into(),
                model: "MR46".into(),
                network_id: None,
            },
        ];
        let out = build_system_instruction(&devices, &NetworkConfig::default());

        for device in &devices {
            assert!(out.contains(&device.serial));
            assert!(out.contains(&device.name));
            assert!(out.contains(&device.model));
        }
        // network_id is not part of the inventory listing
        assert!(!out.contains("n1"));
    }

    #[test]
    fn system_instruction_states_empty_inventory() {
        let out = build_system_instruction(&[], &NetworkConfig::default());
        assert!(out.contains("No devices are currently loaded."));
    }

    #[test]
    fn system_instruction_reflects_configured_platforms() {
        let config = NetworkConfig {
            webex_webhook_url: Some("https://hook.example/webex".into()),
            ..Default::default()
        };
        let out = build_system_instruction(&[], &config);
        assert!(out.contains("webex (configured)"));
        assert!(!out.contains("- webhook (configured)"));

        let none = build_system_instruction(&[], &NetworkConfig::default());
        assert!(none.contains("No notification platforms are configured."));
    }

    #[test]
    fn system_instruction_carries_action_markup_examples() {
        let out = build_system_instruction(&[], &NetworkConfig::default());
        assert!(out.contains("<execute_action>"));
        assert!(out.contains("send_notification"));
        assert!(out.contains("update_device"));
    }

    #[test]
    fn format_history_preserves_order_and_filters() {
        let history = vec![
            turn(Sender::User, "first"),
            turn(Sender::System, "AI_THINKING"),
            turn(Sender::Ai, "second"),
            turn(Sender::Webex, "from the space"),
            intro_turn("welcome!"),
            turn(Sender::User, "third"),
        ];

        let formatted = format_history(&history);
        let texts: Vec<&str> = formatted.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(formatted[0].role, Role::User);
        assert_eq!(formatted[1].role, Role::Model);
    }

    #[test]
    fn build_request_appends_last_turn_verbatim() {
        // Last turn is a Webex turn — normally filtered, but the triggering
        // message must always reach the provider as the final user turn.
        let history = vec![
            turn(Sender::User, "hello"),
            turn(Sender::Webex, "please check the uplink"),
        ];
        let (_, turns) = build_request(&history, &[], &NetworkConfig::default());

        assert_eq!(turns.len(), 2);
        assert_eq!(turns.last().unwrap().text, "please check the uplink");
        assert_eq!(turns.last().unwrap().role, Role::User);
    }

    #[test]
    fn build_request_with_empty_history() {
        let (system, turns) = build_request(&[], &[], &NetworkConfig::default());
        assert!(turns.is_empty());
        assert!(system.contains("No devices are currently loaded."));
    }

    #[test]
    fn build_request_filters_prior_context_only() {
        let history = vec![
            turn(Sender::System, "notice"),
            intro_turn("welcome"),
            turn(Sender::User, "real question"),
        ];
        let (_, turns) = build_request(&history, &[], &NetworkConfig::default());
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text, "real question");
    }
}
