use clap::Parser;
use embedded_hal::delay::DelayNs;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};

mod spin;

/// Reads temperature and humidity from a DS2438 on a bit-banged GPIO line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// GPIO character device
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,
    /// Line offset of the 1-Wire data pin
    #[arg(short, long)]
    line: u32,
    /// Number of measurements, 0 to run forever
    #[arg(short, long, default_value_t = 0)]
    samples: u32,
    /// Pause between measurements
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u32,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Request the data line as an open-drain output, released high
    let mut chip = Chip::new(&args.chip).expect("Failed to open GPIO chip");
    let handle = chip
        .get_line(args.line)
        .expect("Failed to get GPIO line")
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            "ds2438-linux",
        )
        .expect("Failed to request GPIO line");
    let pin = linux_embedded_hal::CdevPin::new(handle).expect("Failed to create GPIO pin");
    // slots need a busy-wait; sleeping is fine for settle and interval waits
    let mut bus =
        onewire_bitbang::BitBang::new(onewire_bitbang::OpenDrain(pin), spin::SpinDelay)
            .expect("Failed to create 1-Wire bus master");
    let mut delay = linux_embedded_hal::Delay;

    // Enumerate devices on the 1-Wire bus
    let mut roms = [0u8; 8 * 16];
    let devices =
        ds2438::Ds2438::enumerate(&mut bus, &mut roms).expect("Failed to enumerate devices");
    log::info!("Found {} devices", devices);
    let mut sensor = ds2438::Ds2438::new();
    for rom in roms[..devices * 8].chunks_exact(8) {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(rom);
        let rom = u64::from_le_bytes(bytes);
        log::info!("ROM: {:016x}", rom);
        // with several devices on the bus, address the last DS2438 found
        if bytes[0] == ds2438::Ds2438::family() && devices > 1 {
            sensor = sensor.with_rom(rom);
        }
    }

    let mut taken = 0;
    while args.samples == 0 || taken < args.samples {
        let mut line = String::new();
        if sensor.measure_into(&mut bus, &mut delay, &mut line) {
            print!("{line}");
        }
        taken += 1;
        delay.delay_ms(args.interval_ms);
    }
}
