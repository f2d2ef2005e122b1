use embassy_executor::Spawner;
use embassy_sync::channel::Channel;

use myrtio_dimmer::{CommandChannel, DimProcessor, DimmerController, SystemClock};
use myrtio_dimmer_app::config::NodeConfig;
use myrtio_dimmer_app::infrastructure::{StdoutSink, spawn_stdin_reader};
use myrtio_dimmer_app::mk_static;

/// Channel for sending commands from stdin to the dimmer task
static COMMANDS: CommandChannel = Channel::new();

type Processor = DimProcessor<SystemClock>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::init();

    let node_config = match std::env::args().nth(1) {
        Some(raw) => match NodeConfig::parse(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::error!("app: {}", e);
                std::process::exit(2);
            }
        },
        None => NodeConfig::default(),
    };
    let config = match node_config.to_dim_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("app: {}", e);
            std::process::exit(2);
        }
    };
    log::info!("app: starting dimmer with {:?}", config);

    let processor = match Processor::new(SystemClock, config) {
        Ok(processor) => mk_static!(Processor, processor),
        Err(e) => {
            log::error!("app: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = spawn_stdin_reader(COMMANDS.sender()) {
        log::error!("app: failed to spawn stdin reader: {}", e);
        std::process::exit(1);
    }
    spawner
        .spawn(dimmer_task(processor))
        .expect("Failed to spawn dimmer task");
}

/// Task for running the dimmer controller
/// It receives commands from the command channel and writes the emitted
/// values to stdout.
#[embassy_executor::task]
async fn dimmer_task(processor: &'static Processor) {
    let mut controller = DimmerController::new(processor, COMMANDS.receiver(), StdoutSink::new());
    controller.run().await;
}
