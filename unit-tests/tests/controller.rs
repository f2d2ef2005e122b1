//! Integration tests for the command dispatch loop.

use embassy_futures::{select::select, yield_now};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use myrtio_dimmer::{
    CommandChannel, CommandError, DimCommand, DimCommandMessage, DimConfigUpdate, DimmerController,
    Status, parse_payload,
};
use tests::{RecordingSink, SinkEvent, quarter_processor};

// -----------------------------------------------------------------------------
// Single interactions
// -----------------------------------------------------------------------------

#[test]
fn dim_forwards_values_with_status_then_completes() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());

    embassy_futures::block_on(controller.handle(&DimCommandMessage::dim(0.5)));

    assert_eq!(
        sink.events(),
        vec![
            SinkEvent::Status(Status::Dimming(25.0)),
            SinkEvent::Value(25.0),
            SinkEvent::Status(Status::Dimming(50.0)),
            SinkEvent::Value(50.0),
            SinkEvent::Status(Status::Clear),
            SinkEvent::Complete,
        ]
    );
}

#[test]
fn pause_forwards_a_single_value() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());

    embassy_futures::block_on(controller.handle(&DimCommandMessage::bare(DimCommand::Pause)));

    assert_eq!(sink.values(), vec![0.0]);
    assert_eq!(sink.completions(), 1);
}

#[test]
fn set_and_reset_forward_their_value() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());

    embassy_futures::block_on(async {
        let set = parse_payload(r#"{"command":"SET","target":0.3}"#).unwrap();
        controller.handle(&set).await;
        let reset = parse_payload(r#"{"command":"RESET","config":{"minValue":50}}"#).unwrap();
        controller.handle(&reset).await;
    });

    assert_eq!(sink.values(), vec![30.0, 50.0]);
    assert_eq!(sink.completions(), 2);
    assert_eq!(processor.config().min_value, 50.0);
}

#[test]
fn invalid_command_is_reported_not_completed() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());

    embassy_futures::block_on(controller.handle(&DimCommandMessage::bare(DimCommand::Set)));

    assert_eq!(
        sink.events(),
        vec![SinkEvent::Fail(CommandError::MissingTarget("SET"))]
    );
    assert_eq!(controller.sink().completions(), 0);
}

#[test]
fn status_text_matches_the_emitted_value() {
    assert_eq!(Status::Dimming(50.0).text().as_str(), "dimming (50)");
    assert_eq!(Status::Dimming(12.5).text().as_str(), "dimming (12.5)");
    assert_eq!(Status::Clear.text().as_str(), "");
}

#[test]
fn status_text_keeps_wide_values_whole() {
    assert_eq!(Status::Dimming(1e30).text().as_str(), "dimming (1e30)");
    assert_eq!(Status::Dimming(-1e300).text().as_str(), "dimming (-1e300)");
    assert_eq!(Status::Dimming(-1e-300).text().as_str(), "dimming (-1e-300)");

    let (processor, _clock) = quarter_processor();
    let wide = DimConfigUpdate::new().with_max_value(1e30);
    let value = processor.set(1.0, Some(&wide)).unwrap();
    assert_eq!(value, 1e30);
    assert_eq!(Status::Dimming(value).text().as_str(), "dimming (1e30)");
}

// -----------------------------------------------------------------------------
// Dispatch loop
// -----------------------------------------------------------------------------

#[test]
fn new_command_supersedes_the_running_transition() {
    let (processor, clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());
    channel.try_send(DimCommandMessage::dim(1.0)).unwrap();

    embassy_futures::block_on(async {
        let driver = async {
            while !sink.values().contains(&50.0) {
                yield_now().await;
            }
            channel.try_send(DimCommandMessage::dim(0.0)).unwrap();
            while sink.completions() < 2 {
                yield_now().await;
            }
        };
        select(controller.run(), driver).await;
    });

    // the tick already due when the command is queued still lands
    assert_eq!(sink.values(), vec![25.0, 50.0, 75.0, 50.0, 25.0, 0.0]);
    assert_eq!(sink.completions(), 2);
    assert_eq!(clock.now_ms(), 14);
    assert_eq!(processor.current_value(), 0.0);
}

#[test]
fn rejected_command_keeps_the_running_transition() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());
    channel.try_send(DimCommandMessage::dim(1.0)).unwrap();

    embassy_futures::block_on(async {
        let driver = async {
            while sink.values().is_empty() {
                yield_now().await;
            }
            channel
                .try_send(DimCommandMessage::bare(DimCommand::Set))
                .unwrap();
            while sink.completions() < 1 {
                yield_now().await;
            }
        };
        select(controller.run(), driver).await;
    });

    assert_eq!(sink.values(), vec![25.0, 50.0, 75.0, 100.0]);
    assert_eq!(sink.failures(), vec![CommandError::MissingTarget("SET")]);
    assert_eq!(sink.completions(), 1);
}

#[test]
fn pause_through_the_channel_ends_the_transition() {
    let (processor, _clock) = quarter_processor();
    let channel: CommandChannel<NoopRawMutex> = Channel::new();
    let sink = RecordingSink::default();
    let mut controller = DimmerController::new(&processor, channel.receiver(), sink.clone());
    channel.try_send(DimCommandMessage::dim(1.0)).unwrap();

    embassy_futures::block_on(async {
        let driver = async {
            while sink.values().is_empty() {
                yield_now().await;
            }
            channel
                .try_send(DimCommandMessage::bare(DimCommand::Pause))
                .unwrap();
            while sink.completions() < 2 {
                yield_now().await;
            }
        };
        select(controller.run(), driver).await;
    });

    // 25 then the due tick 50, then the pause echoes the committed value
    assert_eq!(sink.values(), vec![25.0, 50.0, 50.0]);
    assert_eq!(processor.progress(), 0.5);
}
