//! Entity type to operator table
//!
//! Lookups never fail: entity types without an entry use the default
//! operator.

use std::collections::{BTreeMap, HashMap};

use fz152_common::privacy::patterns::EntityType;
use fz152_domain::constants::DEFAULT_PLACEHOLDER;
use fz152_domain::Operator;

/// Label that addresses the default operator in override maps.
pub const DEFAULT_LABEL: &str = "DEFAULT";

const RUSSIAN_PLACEHOLDERS: &[(&str, &str)] = &[
    ("RU_PASSPORT", "<PASSPORT_RF>"),
    ("RU_SNILS", "<SNILS>"),
    ("RU_INN", "<INN>"),
    ("PERSON", "<PERSON>"),
    ("PHONE_NUMBER", "<PHONE>"),
    ("EMAIL_ADDRESS", "<EMAIL>"),
    ("ORGANIZATION", "<ORG>"),
    ("LOCATION", "<LOC>"),
    ("RU_DRIVER_LICENSE", "<DRIVER_LICENSE>"),
    ("RU_OMS", "<OMS>"),
    ("RU_VEHICLE_PLATE", "<CAR_PLATE>"),
    ("TG_CHAT_ID", "<TG_CHAT_ID>"),
    ("IP_ADDRESS", "<IP>"),
    ("IBAN_CODE", "<BANK_ACCOUNT>"),
    ("CRYPTO", "<WALLET>"),
    ("CREDIT_CARD", "<BANK_CARD>"),
    ("CVV", "<CVV>"),
    ("MAC_ADDRESS", "<MAC>"),
    ("EME_IMEI", "<IMEI>"),
    ("GPS_COORDS", "<GEO>"),
    ("DATE_TIME", "<DATE>"),
    ("RU_INT_PASSPORT", "<PASSPORT_INT>"),
    ("NORP", "<GROUP>"),
    ("FAC", "<LOC>"),
    ("GPE", "<LOC>"),
];

/// Immutable mapping from entity type to [`Operator`], with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    operators: HashMap<EntityType, Operator>,
    default: Operator,
}

impl Default for OperatorConfig {
    /// Empty table; every entity is replaced by `<ENTITY_TYPE>`.
    fn default() -> Self {
        Self::new(Operator::Replace { new_value: None })
    }
}

impl OperatorConfig {
    /// Table with no overrides.
    pub fn new(default: Operator) -> Self {
        Self { operators: HashMap::new(), default }
    }

    /// Short placeholders for the Russian vocabulary, `<ANONYMIZED>` for
    /// anything else.
    pub fn russian_defaults() -> Self {
        RUSSIAN_PLACEHOLDERS.iter().fold(
            Self::new(Operator::replace(DEFAULT_PLACEHOLDER)),
            |config, (label, placeholder)| {
                config.with(EntityType::from_label(label), Operator::replace(*placeholder))
            },
        )
    }

    /// Override the operator for `entity`.
    pub fn with(mut self, entity: EntityType, operator: Operator) -> Self {
        self.operators.insert(entity, operator);
        self
    }

    /// Replace the fallback operator.
    pub fn with_default(mut self, operator: Operator) -> Self {
        self.default = operator;
        self
    }

    /// Apply overrides keyed by entity label. [`DEFAULT_LABEL`] replaces the
    /// fallback operator.
    pub fn with_overrides(self, overrides: &BTreeMap<String, Operator>) -> Self {
        overrides.iter().fold(self, |config, (label, operator)| {
            if label.trim().eq_ignore_ascii_case(DEFAULT_LABEL) {
                config.with_default(operator.clone())
            } else {
                config.with(EntityType::from_label(label), operator.clone())
            }
        })
    }

    /// Operator for `entity`, falling back to the default.
    pub fn resolve(&self, entity: &EntityType) -> &Operator {
        self.operators.get(entity).unwrap_or(&self.default)
    }

    /// Fallback operator.
    pub fn default_operator(&self) -> &Operator {
        &self.default
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
