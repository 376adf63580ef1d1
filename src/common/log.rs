use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

const DEFAULT_DIRECTIVES: &str = "omni=info,omni_layout=info";

pub fn init_logging() {
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_owned());
    let filter = EnvFilter::builder().parse_lossy(directives);

    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_writer(std::io::stderr)
        .with_indent_lines(true);

    if let Err(e) = tracing_subscriber::registry().with(filter).with(tree).try_init() {
        eprintln!("Logging already initialized: {e}");
    }
}
