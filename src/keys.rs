//! Well-known group, value and policy names of the channel config layout

// Groups
pub const ORDERER_GROUP_KEY: &str = "Orderer";
pub const APPLICATION_GROUP_KEY: &str = "Application";
pub const CONSORTIUMS_GROUP_KEY: &str = "Consortiums";

// Channel values
pub const HASHING_ALGORITHM_KEY: &str = "HashingAlgorithm";
pub const BLOCK_DATA_HASHING_STRUCTURE_KEY: &str = "BlockDataHashingStructure";
pub const ORDERER_ADDRESSES_KEY: &str = "OrdererAddresses";
pub const CONSORTIUM_KEY: &str = "Consortium";
pub const CAPABILITIES_KEY: &str = "Capabilities";

// Orderer values
pub const CONSENSUS_TYPE_KEY: &str = "ConsensusType";
pub const BATCH_SIZE_KEY: &str = "BatchSize";
pub const BATCH_TIMEOUT_KEY: &str = "BatchTimeout";
pub const CHANNEL_RESTRICTIONS_KEY: &str = "ChannelRestrictions";
pub const KAFKA_BROKERS_KEY: &str = "KafkaBrokers";

// Organization values
pub const MSP_KEY: &str = "MSP";

// Policies
pub const READERS_POLICY_KEY: &str = "Readers";
pub const WRITERS_POLICY_KEY: &str = "Writers";
pub const ADMINS_POLICY_KEY: &str = "Admins";
pub const BLOCK_VALIDATION_POLICY_KEY: &str = "BlockValidation";
pub const ACCEPT_ALL_POLICY_KEY: &str = "AcceptAllPolicy";
