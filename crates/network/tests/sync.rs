use lumipet_network::{
    core::{AnimationData, ConnectionState, Error, Fps, Grid, PLACEHOLDER_NAME},
    parse_animation_payload, Channels, DeviceSync, MemoryBus, Message,
};
use pretty_assertions::assert_eq;

const HEART: &str = "00000000,01100110,11111111,11111111,01111110,00111100,00011000,00000000";

fn init_sync(state: ConnectionState) -> DeviceSync<MemoryBus> {
    let _ = env_logger::try_init();
    let mut bus = MemoryBus::default();
    bus.set_state(state);
    DeviceSync::new(bus)
}

fn two_frames() -> AnimationData {
    AnimationData::new(
        Fps::new(6).unwrap(),
        vec![HEART.parse().unwrap(), Grid::empty()],
    )
    .unwrap()
}

#[test]
fn test_publish_pattern_requires_connection() {
    for state in [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::Failed,
    ] {
        let mut sync = init_sync(state);
        assert_eq!(
            sync.publish_single_pattern(&Grid::empty()),
            Err(Error::NotConnected(state))
        );
        assert_eq!(
            sync.publish_animation(None, &two_frames()),
            Err(Error::NotConnected(state))
        );
        assert_eq!(
            sync.publish_play_command(Some("wave")),
            Err(Error::NotConnected(state))
        );
        assert!(sync.bus().published().is_empty());
    }
}

#[test]
fn test_publish_single_pattern() {
    let mut sync = init_sync(ConnectionState::Connected);
    sync.publish_single_pattern(&HEART.parse().unwrap()).unwrap();

    assert_eq!(
        sync.bus().published(),
        [Message {
            topic: "LumiPet/pattern/set".to_owned(),
            payload: HEART.to_owned(),
        }]
    );
}

#[test]
fn test_publish_animation_and_play() {
    let mut sync = init_sync(ConnectionState::Connected);
    sync.publish_animation(Some("love"), &two_frames()).unwrap();
    sync.publish_play_command(Some("love")).unwrap();

    let published = sync.into_inner().take_published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].topic, "LumiPet/animation_list/set");
    let payload = parse_animation_payload(&published[0].payload).unwrap();
    assert_eq!(payload.name, "love");
    assert_eq!(payload.fps, Fps::new(6).unwrap());
    assert_eq!(payload.into_animation_data().unwrap(), two_frames());

    assert_eq!(published[1].topic, "LumiPet/animation_play/set");
    assert_eq!(published[1].payload, "love");
}

#[test]
fn test_preview_uses_placeholder_name() {
    let mut sync = init_sync(ConnectionState::Connected);
    sync.preview(None, &two_frames()).unwrap();

    let published = sync.bus().published();
    let payload = parse_animation_payload(&published[0].payload).unwrap();
    assert_eq!(payload.name, PLACEHOLDER_NAME);
    assert_eq!(published[1].payload, PLACEHOLDER_NAME);
}

#[test]
fn test_custom_channels() {
    let channels = Channels {
        pattern: "pet/1/pattern".to_owned(),
        ..Channels::default()
    };
    let mut sync = DeviceSync::with_channels(MemoryBus::connected(), channels);
    sync.publish_single_pattern(&Grid::empty()).unwrap();
    assert_eq!(sync.bus().published()[0].topic, "pet/1/pattern");
}

#[test]
fn test_state_is_read_on_every_publish() {
    let mut bus = MemoryBus::connected();
    {
        let mut sync = DeviceSync::new(&mut bus);
        sync.publish_single_pattern(&Grid::empty()).unwrap();
    }

    // The transport reports the connection loss.
    bus.set_state(ConnectionState::Disconnected);
    let mut sync = DeviceSync::new(&mut bus);
    assert_eq!(
        sync.publish_single_pattern(&Grid::empty()),
        Err(Error::NotConnected(ConnectionState::Disconnected))
    );
    assert_eq!(bus.published().len(), 1);
}

#[test]
fn test_transport_errors_are_surfaced() {
    let mut bus = MemoryBus::connected();
    bus.fail_publish(true);

    let mut sync = DeviceSync::new(bus);
    assert_eq!(
        sync.publish_single_pattern(&Grid::empty()),
        Err(Error::Transport("publish failed".to_owned()))
    );
}
