//! Entry point of the `docker_` Munin plugin.
//!
//! Install it once and symlink it per series:
//!
//! ```bash
//! ln -s /usr/local/bin/docker_ /etc/munin/plugins/docker_status
//! ln -s /usr/local/bin/docker_ /etc/munin/plugins/docker_multi
//! ```

/// Markers `munin-node-configure` greps the plugin file for.
#[used]
static MAGIC_MARKERS: &[u8] = b"\n#%# family=auto\n#%# capabilities=autoconf suggest\n";

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    env_logger::init();
    docker_munin::run(std::env::args()).await
}
