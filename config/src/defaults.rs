//! The config a fresh chia installation starts from.

use crate::{ConfigDocument, ConfigError};

/// Default `config.yaml` for a mainnet installation.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("default_config.yaml");

/// A parsed copy of [`DEFAULT_CONFIG_YAML`].
pub fn default_document() -> Result<ConfigDocument, ConfigError> {
    ConfigDocument::from_yaml_str(DEFAULT_CONFIG_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chia_tools_types::NetworkName;

    #[test]
    fn default_config_is_a_mainnet_config() {
        let doc = default_document().expect("parses");
        assert_eq!(doc.selected_network().expect("network"), NetworkName::new("mainnet").expect("name"));
        assert_eq!(doc.full_node_port().expect("port"), 8444);
        assert_eq!(doc.port_at("daemon_port"), Some(55400));
        assert_eq!(doc.string_at("self_hostname"), Some("localhost"));
        assert_eq!(doc.trusted_peer_ids().len(), 1);
    }

    #[test]
    fn anchors_are_expanded() {
        let doc = default_document().expect("parses");
        assert_eq!(doc.string_at("wallet.selected_network"), Some("mainnet"));
        assert_eq!(doc.string_at("farmer.full_node_peers.0.host"), Some("localhost"));
        assert_eq!(doc.string_at("seeder.logging.log_level"), Some("WARNING"));
    }

    #[test]
    fn service_certificates_are_configured() {
        let doc = default_document().expect("parses");
        for field in [
            "daemon_ssl.private_crt",
            "full_node.ssl.public_crt",
            "full_node.ssl.private_key",
            "wallet.ssl.private_crt",
            "data_layer.ssl.private_key",
            "seeder.crawler.ssl.private_crt",
        ] {
            assert!(doc.string_at(field).is_some(), "{field}");
        }
    }
}
