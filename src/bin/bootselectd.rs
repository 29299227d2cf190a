extern crate bootselect;
extern crate clap;
extern crate env_logger;
extern crate get_if_addrs;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::Read;
use std::process;

use bootselect::core::service::{
    MissPolicy,
    Service,
};
use bootselect::linux::dev::RawSock;
use bootselect::linux::fifo::ConfigFifo;
use bootselect::linux::server::Server;
use bootselect::linux::user;
use bootselect::Result;

/// Answers boot menu selection requests over raw Ethernet frames.
fn main() {
    env_logger::init();

    let matches = clap::App::new("bootselectd")
        .about("Answers boot menu selection requests over raw Ethernet")
        .arg(
            clap::Arg::with_name("interface")
                .short("i")
                .long("interface")
                .value_name("IFACE")
                .help("Network interface to listen on")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Configuration file loaded at startup")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("strict")
                .long("strict")
                .help("Exit when a request has no table entry"),
        )
        .get_matches();

    let ifr_name = match matches
        .value_of("interface")
        .map(|ifr_name| ifr_name.to_string())
        .or_else(default_interface)
    {
        Some(ifr_name) => ifr_name,
        None => {
            eprintln!("bootselectd: no usable network interface found");
            process::exit(1);
        }
    };

    let miss_policy = if matches.is_present("strict") {
        MissPolicy::Fatal
    } else {
        MissPolicy::Diagnose
    };

    if let Err(err) = run(&ifr_name, matches.value_of("config"), miss_policy) {
        error!("bootselectd: {:?}", err);
        process::exit(err.exit_code());
    }
}

/// Picks the first non loopback interface when none is given.
fn default_interface() -> Option<String> {
    get_if_addrs::get_if_addrs()
        .ok()?
        .into_iter()
        .find(|interface| !interface.is_loopback())
        .map(|interface| interface.name)
}

fn run(ifr_name: &str, config: Option<&str>, miss_policy: MissPolicy) -> Result<()> {
    // The raw socket and its filter are the only pieces that need elevated
    // rights; everything past the drop runs as the service account.
    let dev = RawSock::new(ifr_name)?;
    let fifo = ConfigFifo::open()?;
    user::drop_privileges()?;

    let mut service = Service::new(dev, miss_policy);

    if let Some(path) = config {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        let updates = service.reload(&bytes);
        info!("loaded {} entries from {}.", updates, path);
    }

    info!("listening on {}.", ifr_name);
    Server::new(service, fifo)?.run()
}
