//! Static, per-network addresses of provider contracts and their coin registries.
//!
//! Loaded once at startup from an operator supplied YAML file and passed around by
//! reference.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use nemo_common::{models::normalize_type_tag, Address, ObjectId};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read deployment file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Failed to parse deployment: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Map keyed by coin type. Keys are normalized so short and long address forms of the
/// same type hit the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinTable<V>(HashMap<String, V>);

impl<V> CoinTable<V> {
    pub fn get(&self, coin_type: &str) -> Option<&V> {
        self.0.get(&normalize_type_tag(coin_type))
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> std::collections::hash_map::Iter<'_, String, V> {
        self.0.iter()
    }
}

impl<V> Default for CoinTable<V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for CoinTable<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (normalize_type_tag(k.as_ref()), v))
                .collect(),
        )
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CoinTable<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, V>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScallopDeployment {
    pub protocol_package: Address,
    pub converter_package: Address,
    pub version: ObjectId,
    pub market: ObjectId,
    /// sCoin treasury per underlying coin type.
    pub treasuries: CoinTable<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StraterDeployment {
    pub package: Address,
    pub vault: ObjectId,
    /// The vault's share coin.
    pub coin_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AftermathDeployment {
    pub package: Address,
    pub staked_sui_vault: ObjectId,
    pub safe: ObjectId,
    pub referral_vault: ObjectId,
    pub treasury: ObjectId,
    pub validator: Address,
    pub coin_type: String,
}

/// Liquid staking protocols keeping one info object per issued token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiquidStakingDeployment {
    pub package: Address,
    pub lst_infos: CoinTable<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoloDeployment {
    pub package: Address,
    pub stake_pool: ObjectId,
    pub metadata: ObjectId,
    pub coin_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HaedalDeployment {
    pub package: Address,
    pub staking: ObjectId,
    pub validator: Address,
    pub coin_type: String,
    #[serde(default)]
    pub wal: Option<HaedalWalDeployment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HaedalWalDeployment {
    pub package: Address,
    pub staking: ObjectId,
    pub walrus_staking: ObjectId,
    pub validator: Address,
    pub coin_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MstableDeployment {
    pub package: Address,
    /// Tolerated shortfall against the quoted deposit, in basis points.
    pub slippage_bps: u16,
    /// Vault per share coin type.
    pub vaults: CoinTable<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WinterDeployment {
    pub package: Address,
    pub walrus_staking: ObjectId,
    pub lsts: CoinTable<WinterLst>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WinterLst {
    pub staking: ObjectId,
    pub validator: Address,
    /// Whether the protocol lets this token be burned back instantly.
    #[serde(default)]
    pub instant_redeem: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KaiDeployment {
    pub package: Address,
    /// Vault per share coin type.
    pub vaults: CoinTable<ObjectId>,
}

/// Oracle shape for coins whose voucher is resolved by coin identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoinOracle {
    Haedal { staking: ObjectId },
    HaedalWal { staking: ObjectId },
    Volo { stake_pool: ObjectId, metadata: ObjectId },
    Aftermath { staked_sui_vault: ObjectId, safe: ObjectId },
    Strater { vault: ObjectId },
    AlphaFi { lst_info: ObjectId },
    Mstable { vault: ObjectId },
    Kai { vault: ObjectId },
    ScallopMarketCoin { version: ObjectId, market: ObjectId },
    /// Pegged coins priced one to one against their underlying.
    FixedRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct OracleDeployment {
    pub coins: CoinTable<CoinOracle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deployment {
    pub scallop: ScallopDeployment,
    pub strater: StraterDeployment,
    pub aftermath: AftermathDeployment,
    pub spring_sui: LiquidStakingDeployment,
    pub volo: VoloDeployment,
    pub haedal: HaedalDeployment,
    pub alpha_fi: LiquidStakingDeployment,
    pub mstable: MstableDeployment,
    pub winter: WinterDeployment,
    pub kai: KaiDeployment,
    #[serde(default)]
    pub oracle: OracleDeployment,
}

impl Deployment {
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let mut file = File::open(path).map_err(|e| ConfigError::Io(display.clone(), e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ConfigError::Io(display, e))?;
        Self::from_yaml_str(&contents)
    }
}
