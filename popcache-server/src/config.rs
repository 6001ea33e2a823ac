use std::net::SocketAddr;

use clap::Parser;
use popcache::OriginUrl;

/// PoP cache node: caches `GET` responses from a single origin.
#[derive(Debug, Clone, Parser)]
#[command(name = "popcache")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Origin server URL
    #[arg(long, env = "POPCACHE_ORIGIN_URL", default_value = "http://localhost:8888")]
    pub origin_url: OriginUrl,

    /// Address to listen on
    #[arg(long, env = "POPCACHE_LISTEN_ADDR", default_value = "0.0.0.0:8889")]
    pub listen_addr: SocketAddr,

    /// Name of the node, reported by /statusz and sent to the origin
    #[arg(long, env = "POPCACHE_NODE_ID", default_value = "unknown_node")]
    pub node_id: String,
}
