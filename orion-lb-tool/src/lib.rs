// SPDX-FileCopyrightText: © 2025 Huawei Cloud Computing Technologies Co., Ltd
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Huawei Cloud Computing Technologies Co., Ltd
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use orion_data_plane_api::{envoy::config::cluster::v3::Cluster, prost::Message};
use orion_lb_policy::{config::Config, options::Options, LbConfigFactory, LbPolicyConfig, Result};
use std::path::Path;

pub fn run() -> Result<()> {
    let mut tracing_manager = tool_tracing::TracingManager::new();

    let options = Options::parse_options();
    let Config { logging, lb_policy } = Config::new(&options)?;
    tracing_manager.update(logging)?;

    let factory = LbConfigFactory::from_settings(&lb_policy);
    let cluster = read_cluster(&options.cluster)?;
    let config = factory.new_config(&cluster)?;
    tracing::info!(cluster = cluster.name.as_str(), policy = config.name(), "resolved load balancing policy");

    println!("{}", render(&config, options.pretty)?);
    Ok(())
}

/// Reads a binary protobuf encoded `envoy.config.cluster.v3.Cluster`.
pub fn read_cluster(path: &Path) -> Result<Cluster> {
    let bytes = std::fs::read(path)?;
    Ok(Cluster::decode(bytes.as_slice())?)
}

pub fn render(config: &LbPolicyConfig, pretty: bool) -> Result<String> {
    let rendered = if pretty { serde_json::to_string_pretty(config) } else { serde_json::to_string(config) }?;
    Ok(rendered)
}

mod tool_tracing {
    use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
    use tracing_subscriber::{
        filter::LevelFilter,
        fmt,
        fmt::format::{DefaultFields, Format},
        layer::Layered,
        reload,
        reload::Handle,
        EnvFilter, Registry,
    };

    use orion_lb_policy::{config::Log, Result};

    type RegistryLayer =
        fmt::Layer<Layered<reload::Layer<EnvFilter, Registry>, Registry>, DefaultFields, Format, NonBlocking>;
    type FilterReloadHandle = Handle<EnvFilter, Registry>;
    type LayerReloadHandle = Handle<RegistryLayer, Layered<reload::Layer<EnvFilter, Registry>, Registry>>;

    pub struct TracingManager {
        guard: WorkerGuard,
        layer_reload_handle: LayerReloadHandle,
        filter_reload_handle: FilterReloadHandle,
    }

    impl TracingManager {
        pub fn new() -> Self {
            let level = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).parse_lossy(""));
            let (guard, layer_reload_handle, filter_reload_handle) = Self::init_tracing(Registry::default(), level);
            TracingManager { guard, layer_reload_handle, filter_reload_handle }
        }

        pub fn update(&mut self, mut log_conf: Log) -> Result<()> {
            self.filter_reload_handle.modify(|filter| *filter = log_conf.env_filter())?;

            // stdout carries the resulting config, logs go to stderr unless a file is configured
            if let Some(log_file) = log_conf.log_file {
                self.layer_reload_handle.modify(|layer| {
                    let (new_guard, new_layer) = Self::file_layer(&log_file, log_conf.log_directory.as_deref());
                    *layer = new_layer;
                    self.guard = new_guard;
                })?;
            }

            Ok(())
        }

        fn init_tracing(
            registry: Registry,
            env_filter: EnvFilter,
        ) -> (WorkerGuard, LayerReloadHandle, FilterReloadHandle) {
            use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

            let (guard, layer) = Self::stderr_layer();
            let (layer, layer_reload_handle) = reload::Layer::new(layer);
            let (env_filter, filter_reload_handle) = reload::Layer::new(env_filter);

            registry.with(env_filter).with(layer).init();
            (guard, layer_reload_handle, filter_reload_handle)
        }

        fn stderr_layer() -> (WorkerGuard, RegistryLayer) {
            let out = std::io::stderr();
            let is_terminal = std::io::IsTerminal::is_terminal(&out);
            let (non_blocking, guard) = tracing_appender::non_blocking(out);
            let mut std_layer = fmt::layer().with_writer(non_blocking);

            if !is_terminal {
                std_layer = std_layer.with_ansi(false);
            }

            (guard, std_layer)
        }

        fn file_layer(filename: &str, log_directory: Option<&str>) -> (WorkerGuard, RegistryLayer) {
            let file_appender = tracing_appender::rolling::hourly(log_directory.unwrap_or("."), filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);

            (guard, file_layer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orion_data_plane_api::envoy::config::cluster::v3::cluster::LbPolicy;

    // removes the file before returning
    fn read_from_file(name: &str, contents: &[u8]) -> Result<Cluster> {
        let path = std::env::temp_dir().join(format!("orion-lb-tool-{name}-{}.pb", std::process::id()));
        std::fs::write(&path, contents)?;
        let read = read_cluster(&path);
        std::fs::remove_file(&path)?;
        read
    }

    #[test]
    fn read_and_render_cluster() {
        let cluster = Cluster { name: "cluster-a".to_owned(), lb_policy: LbPolicy::RoundRobin as i32, ..Default::default() };
        let read = read_from_file("round-robin", &cluster.encode_to_vec()).unwrap();
        assert_eq!(read, cluster);

        let config = orion_lb_policy::new_config(&read, false, &|_: &str| true).unwrap();
        assert_eq!(render(&config, false).unwrap(), r#"{"wrr_locality":{"childPolicy":[{"round_robin":{}}]}}"#);
        assert!(render(&config, true).unwrap().contains('\n'));
    }

    #[test]
    fn unreadable_cluster() {
        assert!(matches!(read_cluster(Path::new("/nonexistent/cluster.pb")), Err(orion_lb_policy::Error::Io(_))));

        let read = read_from_file("garbage", &[0xff, 0xff]);
        assert!(matches!(read, Err(orion_lb_policy::Error::Decode(_))));
    }
}
