//! Named networks the deployer knows how to reach without extra
//! configuration.

use {
    alloy::primitives::Address,
    anyhow::{Context, Result, ensure},
    url::Url,
};

/// A network resolved from its name and an optional node URL override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub name: String,
    pub node_url: Url,
    /// Chain ID the node must report. `None` for networks that are not part
    /// of the registry.
    pub expected_chain_id: Option<u64>,
    /// Block explorer used to print links to deployed contracts.
    pub explorer: Option<Url>,
}

struct Known {
    chain_id: u64,
    node_url: &'static str,
    explorer: Option<&'static str>,
}

fn known(name: &str) -> Option<Known> {
    // Chain IDs and endpoints are listed at https://chainid.network/chains.json
    match name {
        "hardhat" | "localhost" => Some(Known {
            chain_id: 31337,
            node_url: "http://127.0.0.1:8545",
            explorer: None,
        }),
        "baseSepolia" => Some(Known {
            chain_id: 84532,
            node_url: "https://sepolia.base.org",
            explorer: Some("https://sepolia.basescan.org"),
        }),
        _ => None,
    }
}

impl Network {
    pub fn resolve(name: &str, node_url: Option<Url>) -> Result<Self> {
        let Some(known) = known(name) else {
            let node_url = node_url
                .with_context(|| format!("unknown network {name:?} requires a node URL"))?;
            return Ok(Self {
                name: name.to_owned(),
                node_url,
                expected_chain_id: None,
                explorer: None,
            });
        };

        let node_url = match node_url {
            Some(url) => url,
            None => known.node_url.parse()?,
        };
        let explorer = known.explorer.map(str::parse::<Url>).transpose()?;
        Ok(Self {
            name: name.to_owned(),
            node_url,
            expected_chain_id: Some(known.chain_id),
            explorer,
        })
    }

    /// Makes sure the node we are connected to serves the network we think it
    /// does.
    pub fn verify_chain_id(&self, chain_id: u64) -> Result<()> {
        if let Some(expected) = self.expected_chain_id {
            ensure!(
                expected == chain_id,
                "node reports chain ID {chain_id} but network {} has chain ID {expected}",
                self.name
            );
        }
        Ok(())
    }

    pub fn explorer_address_url(&self, address: Address) -> Option<Url> {
        self.explorer
            .as_ref()?
            .join(&format!("address/{}", address.to_checksum(None)))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address};

    #[test]
    fn known_network_uses_default_endpoint() {
        let network = Network::resolve("baseSepolia", None).unwrap();

        assert_eq!(network.node_url.as_str(), "https://sepolia.base.org/");
        assert_eq!(network.expected_chain_id, Some(84532));
        assert_eq!(
            network
                .explorer_address_url(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
                .unwrap()
                .as_str(),
            "https://sepolia.basescan.org/address/0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn node_url_overrides_default_endpoint() {
        let url: Url = "http://10.0.0.2:8545".parse().unwrap();
        let network = Network::resolve("localhost", Some(url.clone())).unwrap();

        assert_eq!(network.node_url, url);
        assert_eq!(network.expected_chain_id, Some(31337));
        assert!(network.explorer_address_url(Address::ZERO).is_none());
    }

    #[test]
    fn unknown_network_requires_node_url() {
        assert!(Network::resolve("devnet", None).is_err());

        let network =
            Network::resolve("devnet", Some("http://devnet:8545".parse().unwrap())).unwrap();
        assert_eq!(network.expected_chain_id, None);
        network.verify_chain_id(1337).unwrap();
    }

    #[test]
    fn rejects_mismatching_chain_id() {
        let network = Network::resolve("baseSepolia", None).unwrap();

        network.verify_chain_id(84532).unwrap();
        assert!(network.verify_chain_id(1).is_err());
    }
}
