//! Command line host for the security alarm engine.
//!
//! Every invocation opens the state file, applies one event, and exits.
//!
//! Usage:
//!   security-alarm status
//!   security-alarm arm home
//!   security-alarm sensor add "Front door" door
//!   security-alarm sensor set "Front door" on
//!   security-alarm image snapshot.jpg

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use security_alarm::config::{self, Config};
use security_alarm::data_lock::DataLock;
use security_alarm::image::SamplingImageService;
use security_alarm::repository::JsonFileRepository;
use security_alarm::service::LoggingListener;
use security_alarm::{
    ArmingStatus, Image, ImageService, Result, SecurityError, SecurityRepository, SecurityService,
    Sensor, SensorType,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "security-alarm")]
#[command(about = "Home security alarm control")]
struct Cli {
    /// Alarm state file
    #[arg(long, env = "SECURITY_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Minimum cat confidence (percent) for camera frames, overrides
    /// CAT_CONFIDENCE_THRESHOLD
    #[arg(long)]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show alarm status, arming status and sensors
    Status,
    /// Arm the system
    Arm {
        #[arg(value_enum)]
        mode: ArmMode,
    },
    /// Disarm the system and clear the alarm
    Disarm,
    /// Manage sensors
    Sensor {
        #[command(subcommand)]
        command: SensorCommand,
    },
    /// Run cat detection on a camera frame
    Image {
        /// Image file to analyse
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum SensorCommand {
    /// Register a new sensor
    Add {
        name: String,
        /// door, window or motion
        sensor_type: SensorType,
    },
    /// Remove a sensor by name
    Remove { name: String },
    /// Activate or deactivate a sensor
    Set {
        name: String,
        #[arg(value_enum)]
        state: SwitchState,
    },
    /// List sensors
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum ArmMode {
    Home,
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SwitchState {
    On,
    Off,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    config::load_dotenv();
    init_logger();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(path) = cli.data_file {
        config.storage.data_file = path;
    }
    if let Some(threshold) = cli.threshold {
        config.image.confidence_threshold = threshold;
    }

    let _lock = DataLock::acquire(&config.storage.data_file)?;
    info!("Using state file {:?}", config.storage.data_file);

    let repository = JsonFileRepository::open(&config.storage.data_file);
    let images = SamplingImageService::new(config.image.detection_rate);
    let mut service = SecurityService::new(repository, images)
        .with_confidence_threshold(config.image.confidence_threshold);
    service.add_status_listener(Arc::new(LoggingListener));

    match cli.command {
        Commands::Status => {}
        Commands::Arm { mode } => service.set_arming_status(mode.into())?,
        Commands::Disarm => service.set_arming_status(ArmingStatus::Disarmed)?,
        Commands::Sensor { command } => match command {
            SensorCommand::Add { name, sensor_type } => {
                if find_sensor(&service, &name).is_ok() {
                    warn!("A sensor named '{}' already exists", name);
                }
                service.add_sensor(&Sensor::new(name, sensor_type))?;
            }
            SensorCommand::Remove { name } => {
                let sensor = find_sensor(&service, &name)?;
                service.remove_sensor(&sensor)?;
            }
            SensorCommand::Set { name, state } => {
                let mut sensor = find_sensor(&service, &name)?;
                service.change_sensor_activation(&mut sensor, state == SwitchState::On)?;
            }
            SensorCommand::List => {
                print_sensors(&service)?;
                return Ok(());
            }
        },
        Commands::Image { path } => {
            let image = Image::open(&path)?;
            service.process_image(&image)?;
        }
    }

    print_status(&service)
}

fn find_sensor<R, I>(service: &SecurityService<R, I>, name: &str) -> Result<Sensor>
where
    R: SecurityRepository,
    I: ImageService,
{
    service
        .sensors()?
        .into_iter()
        .find(|s| s.name() == name)
        .ok_or_else(|| SecurityError::UnknownSensor(name.to_string()))
}

fn print_sensors<R, I>(service: &SecurityService<R, I>) -> Result<()>
where
    R: SecurityRepository,
    I: ImageService,
{
    let sensors = service.sensors()?;
    if sensors.is_empty() {
        println!("No sensors registered");
    }
    for sensor in sensors {
        println!(
            "  {:<24} {:<8} {}",
            sensor.name(),
            sensor.sensor_type(),
            if sensor.is_active() { "active" } else { "inactive" }
        );
    }
    Ok(())
}

fn print_status<R, I>(service: &SecurityService<R, I>) -> Result<()>
where
    R: SecurityRepository,
    I: ImageService,
{
    println!("Alarm:  {}", service.alarm_status()?);
    println!("Arming: {}", service.arming_status()?);
    print_sensors(service)
}
