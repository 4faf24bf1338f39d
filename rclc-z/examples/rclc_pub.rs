use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::Parser;
use rclc_z::allocator::Allocator;
use rclc_z::init::{Support, support_fini, support_init_with_options};
use rclc_z::node::node_init_default;
use rclc_z::publisher::publisher_init_default;
use rclc_z::rcl::{InitOptions, MessageTypeInfo, Node, Publisher, Timer, TypeSupport};
use rclc_z::timer::timer_init_default;
use serde::Serialize;

#[derive(Serialize)]
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
    /// Seconds between messages
    #[arg(short, long, default_value = "1.0")]
    period: f64,
    #[arg(short, long, default_value = "peer")]
    mode: String,
    /// Defaults to a zenoh router on localhost
    #[arg(short, long)]
    endpoint: Option<String>,
    /// Stop after this many messages
    #[arg(short, long)]
    count: Option<usize>,
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
    node_init_default(&mut node, "rclc_talker", "", &support)?;

    let mut publisher = Publisher::default();
    publisher_init_default(&mut publisher, &node, &TypeSupport::of::<RosString>(), &args.topic)?;
    let publisher = Arc::new(publisher);

    let sent = Arc::new(AtomicUsize::new(0));
    let mut timer = Timer::default();
    {
        let publisher = publisher.clone();
        let sent = sent.clone();
        let period_ns = Duration::from_secs_f64(args.period).as_nanos() as u64;
        timer_init_default(
            &mut timer,
            &support,
            period_ns,
            Arc::new(move |_: &mut Timer, _: i64| {
                let n = sent.fetch_add(1, Ordering::Relaxed) + 1;
                let msg = RosString {
                    data: format!("Hello World: {n}"),
                };
                println!("Publishing: '{}'", msg.data);
                if let Err(e) = publisher.publish(&msg) {
                    eprintln!("publish failed: {e}");
                }
            }),
        )?;
    }

    while args.count.is_none_or(|max| sent.load(Ordering::Relaxed) < max) {
        let wait = timer.time_until_next_call()?;
        if wait > 0 {
            std::thread::sleep(Duration::from_nanos(wait as u64));
        }
        timer.call()?;
    }

    timer.fini()?;
    if let Some(mut publisher) = Arc::into_inner(publisher) {
        publisher.fini()?;
    }
    node.fini()?;
    support_fini(&mut support)
}
