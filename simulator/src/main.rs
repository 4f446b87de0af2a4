use anyhow::{bail, Context};
use clap::Parser;
use detection_client::DetectionClient;
use generator::profile::{build_scene_from_config, GeneratorConfig};
use generator::template::reference_scene;
use server::routes::DetectionServer;
use server::scene::SceneModel;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::SimulatorConfig;
use workflow::probe::Prober;

mod generator;
mod server;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Local object-detection server simulator")]
struct Args {
    /// Load simulator settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    /// Port to bind; 0 picks a free one
    #[arg(long)]
    port: Option<u16>,
    /// Generate a random scene with this many objects
    #[arg(long)]
    objects: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Query the running server once through the client and print the result
    #[arg(long, default_value_t = false)]
    probe: bool,
    /// Also read every field of the object at this index; implies --probe
    #[arg(long, allow_hyphen_values = true)]
    index: Option<i64>,
    /// Keep serving after probing until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

impl Args {
    fn probing(&self) -> bool {
        self.probe || self.index.is_some()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let probing = args.probing();

    let mut config = if let Some(path) = args.config {
        SimulatorConfig::load(path)?
    } else {
        SimulatorConfig::default()
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.objects.is_some() || args.seed.is_some() {
        let scene = config.scene.get_or_insert_with(GeneratorConfig::default);
        if let Some(count) = args.objects {
            scene.object_count = count;
        }
        if let Some(seed) = args.seed {
            scene.seed = seed;
        }
    }

    let objects = match &config.scene {
        Some(generator) => build_scene_from_config(generator).context("generating scene")?,
        None => reference_scene(),
    };
    let object_count = objects.len();
    let server = DetectionServer::spawn(config.bind_address()?, SceneModel::new(objects))?;
    println!(
        "Serving {} objects on http://{} (get_closest_object, get_all_objects)",
        object_count,
        server.local_addr()
    );

    if probing {
        let client = DetectionClient::from_config(config.client_config(server.local_addr()))
            .context("building detection client")?;
        let report = Prober::new(client).execute(args.index);
        print!("{}", report);
        if report.successes() == 0 {
            server.stop();
            bail!("probe could not read any field from {}", report.target);
        }
    }

    if args.serve || !probing {
        println!("Detection server running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    server.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_flag_implies_probe() {
        let args = Args::try_parse_from(["detection-simulator", "--index", "-1"]).unwrap();
        assert_eq!(args.index, Some(-1));
        assert!(args.probing());

        let args = Args::try_parse_from(["detection-simulator", "--port", "0"]).unwrap();
        assert!(!args.probing());
    }
}
