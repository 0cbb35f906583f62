use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub backend: BackendConfig,
    /// Namespace whose averages appear on the home page stat cards.
    #[serde(default = "default_home_namespace")]
    pub home_namespace: String,
    /// Every nth metric sample is kept when thinning chart points.
    #[serde(default = "default_chart_stride")]
    pub chart_stride: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_name: default_cluster_name(),
            listen_port: default_listen_port(),
            backend: BackendConfig::default(),
            home_namespace: default_home_namespace(),
            chart_stride: default_chart_stride(),
        }
    }
}

fn default_cluster_name() -> String {
    "RustCost".to_string()
}

fn default_listen_port() -> u16 {
    9090
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_home_namespace() -> String {
    "kube-system".to_string()
}

fn default_chart_stride() -> usize {
    10
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("reading config {}: {}", path.display(), e))?;
        let cfg: Config =
            serde_yaml::from_str(&data).map_err(|e| format!("parsing config: {}", e))?;

        if cfg.backend.base_url.is_empty() {
            return Err("backend.base_url must not be empty".into());
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.listen_port, 9090);
        assert_eq!(cfg.home_namespace, "kube-system");
        assert_eq!(cfg.chart_stride, 10);
        assert!(!cfg.backend.base_url.is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config =
            serde_yaml::from_str("backend:\n  base_url: http://metrics:3000\n").unwrap();
        assert_eq!(cfg.backend.base_url, "http://metrics:3000");
        assert_eq!(cfg.listen_port, 9090);
        assert_eq!(cfg.cluster_name, "RustCost");
    }
}
