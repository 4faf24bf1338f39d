use std::time::Duration;

use clap::Parser;
use rclc_z::allocator::Allocator;
use rclc_z::init::{Support, support_fini, support_init_with_options};
use rclc_z::node::node_init_default;
use rclc_z::rcl::{InitOptions, MessageTypeInfo, Node, Subscription, TypeSupport};
use rclc_z::ret::RclError;
use rclc_z::subscription::{subscription_init_best_effort, subscription_init_default};
use serde::Deserialize;

#[derive(Deserialize)]
struct RosString {
    data: String,
}

impl MessageTypeInfo for RosString {
    fn type_name() -> &'static str {
        "std_msgs::msg::dds_::String_"
    }
}

#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long, default_value = "chatter")]
    topic: String,
    #[arg(short, long, default_value = "peer")]
    mode: String,
    /// Defaults to a zenoh router on localhost
    #[arg(short, long)]
    endpoint: Option<String>,
    #[arg(long)]
    best_effort: bool,
    /// Exit after this many seconds without a message
    #[arg(long)]
    idle_timeout: Option<f64>,
}

fn main() -> rclc_z::Result<()> {
    let args = Args::parse();
    let options = InitOptions::new().with_mode(args.mode).with_connect_endpoints([args
        .endpoint
        .unwrap_or_else(|| "tcp/127.0.0.1:7447".to_string())]);

    let allocator = Allocator::new();
    let mut support = Support::default();
    support_init_with_options(&mut support, &std::env::args().collect::<Vec<_>>(), &options, &allocator)?;

    let mut node = Node::default();
    node_init_default(&mut node, "rclc_listener", "", &support)?;

    let ts = TypeSupport::of::<RosString>();
    let mut sub = Subscription::default();
    if args.best_effort {
        subscription_init_best_effort(&mut sub, &node, &ts, &args.topic)?;
    } else {
        subscription_init_default(&mut sub, &node, &ts, &args.topic)?;
    }

    let timeout = args
        .idle_timeout
        .map_or(Duration::MAX, Duration::from_secs_f64);
    loop {
        match sub.recv_timeout::<RosString>(timeout) {
            Ok(msg) => println!("I heard: [{}]", msg.data),
            Err(RclError::Timeout) => break,
            Err(e) => return Err(e),
        }
    }

    sub.fini()?;
    node.fini()?;
    support_fini(&mut support)
}
