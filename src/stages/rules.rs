//! The remap rule table and its API-surface partitioning.
//!
//! Rules are static configuration supplied at engine startup. Every
//! consistency property - unique keys within a surface, disjoint namespace
//! prefixes across surfaces, no unreachable rules - is validated eagerly at
//! construction, so a bad table is an engine startup failure and never a
//! per-contract surprise.

use std::collections::HashMap;

use crate::{
    descriptor::{format_method_descriptor, parse_method_descriptor, MethodDescriptor},
    model::{CallSite, DispatchKind},
    Result,
};

/// One call-site rewrite: a four-field key and the replacement signature.
///
/// The key is (owner, name, source descriptor, dispatch kind); a call site must
/// match all four fields exactly. Only the descriptor is replaced on a hit -
/// the rewritten call binds to the shadow-typed variant of the same member,
/// resolved separately by symbol plus new signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    /// Fully-qualified symbol of the class or interface owning the member
    pub owner: String,
    /// Member name
    pub name: String,
    /// Dispatch kind the call site must use
    pub dispatch: DispatchKind,
    /// Signature the call site must carry for the rule to apply
    pub source: MethodDescriptor,
    /// Signature the call site is rewritten to
    pub replacement: MethodDescriptor,
}

impl RemapRule {
    /// Build a rule from descriptor text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if either descriptor does not parse.
    pub fn parse(
        owner: &str,
        name: &str,
        dispatch: DispatchKind,
        source: &str,
        replacement: &str,
    ) -> Result<RemapRule> {
        Ok(RemapRule {
            owner: owner.to_string(),
            name: name.to_string(),
            dispatch,
            source: parse_method_descriptor(source)?,
            replacement: parse_method_descriptor(replacement)?,
        })
    }
}

/// The matching body of a rule, stored under its (owner, name) bucket.
#[derive(Debug, Clone)]
struct RuleBody {
    dispatch: DispatchKind,
    source: MethodDescriptor,
    replacement: MethodDescriptor,
}

/// One generation of the host-facing API: a namespace partition plus its rules.
///
/// A surface owns one or more owner-symbol prefixes. Rule lookup first resolves
/// which surface a call's owner belongs to, then consults only that surface's
/// rules - rules from different surfaces never cross-match, even when member
/// names and signatures coincide.
#[derive(Debug, Clone)]
pub struct ApiSurface {
    name: String,
    prefixes: Vec<String>,
    rules: HashMap<String, HashMap<String, Vec<RuleBody>>>,
    rule_count: usize,
}

impl ApiSurface {
    /// Build a surface from its namespace prefixes and rules.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if a prefix is empty or duplicated, if
    /// a rule's owner lies outside every prefix (the rule would be
    /// unreachable), or if two rules share the same
    /// (owner, name, source, dispatch) key.
    pub fn build(name: &str, prefixes: &[&str], rules: Vec<RemapRule>) -> Result<ApiSurface> {
        let mut owned_prefixes: Vec<String> = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            if prefix.is_empty() {
                return Err(config_error!("Surface '{}' has an empty prefix", name));
            }
            if owned_prefixes.iter().any(|existing| existing == prefix) {
                return Err(config_error!(
                    "Surface '{}' lists prefix '{}' twice",
                    name,
                    prefix
                ));
            }
            owned_prefixes.push((*prefix).to_string());
        }

        let mut surface = ApiSurface {
            name: name.to_string(),
            prefixes: owned_prefixes,
            rules: HashMap::new(),
            rule_count: 0,
        };

        for rule in rules {
            if !surface
                .prefixes
                .iter()
                .any(|prefix| rule.owner.starts_with(prefix.as_str()))
            {
                return Err(config_error!(
                    "Rule for {}.{} is unreachable: owner outside surface '{}' prefixes",
                    rule.owner,
                    rule.name,
                    surface.name
                ));
            }

            let bucket = surface
                .rules
                .entry(rule.owner.clone())
                .or_default()
                .entry(rule.name.clone())
                .or_default();

            if bucket
                .iter()
                .any(|body| body.dispatch == rule.dispatch && body.source == rule.source)
            {
                return Err(config_error!(
                    "Surface '{}' has colliding rules for {} {}.{}{}",
                    surface.name,
                    rule.dispatch,
                    rule.owner,
                    rule.name,
                    format_method_descriptor(&rule.source)
                ));
            }

            bucket.push(RuleBody {
                dispatch: rule.dispatch,
                source: rule.source,
                replacement: rule.replacement,
            });
            surface.rule_count += 1;
        }

        Ok(surface)
    }

    /// The surface's configured name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rules in this surface.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Length of the longest prefix of this surface matching `owner`, if any.
    fn claim(&self, owner: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .filter(|prefix| owner.starts_with(prefix.as_str()))
            .map(String::len)
            .max()
    }

    /// The replacement signature for `call`, if a rule matches all four key fields.
    #[must_use]
    pub fn replacement_for(&self, call: &CallSite) -> Option<&MethodDescriptor> {
        self.rules
            .get(call.owner.as_str())?
            .get(call.name.as_str())?
            .iter()
            .find(|body| body.dispatch == call.dispatch && body.source == call.descriptor)
            .map(|body| &body.replacement)
    }
}

/// All active API surfaces of one engine configuration.
#[derive(Debug, Clone, Default)]
pub struct RemapRuleTable {
    surfaces: Vec<ApiSurface>,
}

impl RemapRuleTable {
    /// An empty table; every call passes through unchanged.
    #[must_use]
    pub fn empty() -> Self {
        RemapRuleTable::default()
    }

    /// Assemble the table from its surfaces.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if two surfaces share a name, or if a
    /// prefix of one surface is equal to or extends a prefix of another -
    /// overlap would make surface resolution ambiguous.
    pub fn new(surfaces: Vec<ApiSurface>) -> Result<RemapRuleTable> {
        for (index, surface) in surfaces.iter().enumerate() {
            for other in &surfaces[index + 1..] {
                if surface.name == other.name {
                    return Err(config_error!("Two surfaces named '{}'", surface.name));
                }
                for prefix in &surface.prefixes {
                    for other_prefix in &other.prefixes {
                        if prefix.starts_with(other_prefix.as_str())
                            || other_prefix.starts_with(prefix.as_str())
                        {
                            return Err(config_error!(
                                "Surfaces '{}' and '{}' overlap on prefixes '{}' and '{}'",
                                surface.name,
                                other.name,
                                prefix,
                                other_prefix
                            ));
                        }
                    }
                }
            }
        }

        Ok(RemapRuleTable { surfaces })
    }

    /// Number of configured surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// The surface whose namespace claims `owner`, by longest prefix match.
    #[must_use]
    pub fn surface_for(&self, owner: &str) -> Option<&ApiSurface> {
        self.surfaces
            .iter()
            .filter_map(|surface| surface.claim(owner).map(|length| (length, surface)))
            .max_by_key(|(length, _)| *length)
            .map(|(_, surface)| surface)
    }

    /// The replacement signature for `call`, consulting only its owner's surface.
    #[must_use]
    pub fn replacement_for(&self, call: &CallSite) -> Option<&MethodDescriptor> {
        self.surface_for(&call.owner)?.replacement_for(call)
    }
}

/// The two-generation rule table of the host engine.
///
/// The legacy `avm` surface and the current `score` surface stay active
/// side by side so contracts compiled against either SDK generation keep
/// deploying.
///
/// # Errors
/// Returns [`crate::Error::Config`] only if the built-in table is
/// inconsistent, which would be a bug in this crate.
pub fn host_api_table() -> Result<RemapRuleTable> {
    let avm = ApiSurface::build(
        "avm",
        &["p/avm/"],
        vec![RemapRule::parse(
            "p/avm/Blockchain",
            "avm_log",
            DispatchKind::Static,
            "(Lw/_p/avm/Value;Lw/_p/avm/Value;)V",
            "([Li/ObjectArray;Li/ObjectArray;)V",
        )?],
    )?;

    let score = ApiSurface::build(
        "score",
        &["p/score/", "s/java/"],
        vec![
            RemapRule::parse(
                "p/score/Context",
                "avm_log",
                DispatchKind::Static,
                "(Lw/_Lp/score/Value;Lw/_Lp/score/Value;)V",
                "(Li/IObjectArray;Li/IObjectArray;)V",
            )?,
            RemapRule::parse(
                "s/java/util/Map",
                "avm_ofEntries",
                DispatchKind::Static,
                "(Lw/_Ls/java/util/Map$Entry;)Ls/java/util/Map;",
                "(Li/IObjectArray;)Ls/java/util/Map;",
            )?,
        ],
    )?;

    RemapRuleTable::new(vec![avm, score])
}
