//! Declarative surface rule tree: condition and rule nodes in flat arenas,
//! referenced by index, walked per cell with memoized conditions.

use crate::biome::BiomeId;
use crate::material::MaterialId;

/// Index of a condition node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionId(pub(crate) usize);

/// Index of a rule node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleId(pub(crate) usize);

/// Named surface noises conditions may range-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceNoiseId {
    /// The primary surface depth noise.
    Surface,
    /// The secondary patch noise.
    Secondary,
}

/// A Y reference for [`ConditionNode::YAbove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// A fixed world Y.
    Absolute(i32),
    /// Blocks above the generation floor.
    AboveBottom(i32),
    /// Blocks below the generation ceiling.
    BelowTop(i32),
}

impl VerticalAnchor {
    /// Resolves against the world bounds.
    #[must_use]
    pub fn resolve(&self, min_y: i32, max_y: i32) -> i32 {
        match *self {
            Self::Absolute(y) => y,
            Self::AboveBottom(offset) => min_y + offset,
            Self::BelowTop(offset) => max_y - offset,
        }
    }
}

/// Which stone-depth counter a depth check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaveSurface {
    /// Distance from the top of the solid run.
    Floor,
    /// Distance from the bottom of the solid run.
    Ceiling,
}

/// Condition nodes.
#[derive(Debug, Clone)]
pub enum ConditionNode {
    /// The column's biome is one of the listed ids.
    Biome(Vec<BiomeId>),
    /// A named noise at (x, z) falls inside `[min, max]`.
    NoiseRange {
        noise: SurfaceNoiseId,
        min: f64,
        max: f64,
    },
    /// Y is at or above an anchor, offset by the running surface depth.
    YAbove {
        anchor: VerticalAnchor,
        surface_depth_multiplier: i32,
    },
    /// The cell sits within a depth band of the run floor or ceiling.
    StoneDepth {
        offset: i32,
        add_surface_depth: bool,
        secondary_depth_range: i32,
        surface: CaveSurface,
    },
    /// The column drops steeply against its neighbors.
    Steep,
    /// The biome freezes water at this Y.
    Frozen,
    /// Y is at or above the preliminary surface estimate.
    AbovePreliminarySurface,
    /// The surface depth reached zero (exposed cave mouth).
    Hole,
    /// No water stands within `offset` blocks above the cell.
    WaterDepth {
        offset: i32,
        surface_depth_multiplier: i32,
    },
    /// Logical negation.
    Not(ConditionId),
}

/// Rule nodes.
#[derive(Debug, Clone)]
pub enum RuleNode {
    /// Emit a fixed material.
    Block(MaterialId),
    /// First child returning a material wins.
    Sequence(Vec<RuleId>),
    /// Child applies only where the condition holds.
    Conditional {
        condition: ConditionId,
        then_rule: RuleId,
    },
    /// Biome-banded material lookup (terracotta-style striping).
    Bands,
}

/// An immutable surface rule tree.
#[derive(Debug, Clone)]
pub struct RuleTree {
    pub(crate) conditions: Vec<ConditionNode>,
    pub(crate) rules: Vec<RuleNode>,
    pub(crate) root: RuleId,
}

impl RuleTree {
    /// Number of condition nodes (sizes the per-column memo cache).
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }
}

/// Builder assembling a [`RuleTree`] bottom-up.
#[derive(Debug, Default)]
pub struct RuleTreeBuilder {
    conditions: Vec<ConditionNode>,
    rules: Vec<RuleNode>,
}

impl RuleTreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition node.
    pub fn condition(&mut self, node: ConditionNode) -> ConditionId {
        self.conditions.push(node);
        ConditionId(self.conditions.len() - 1)
    }

    /// Adds a negation of an existing condition.
    pub fn not(&mut self, inner: ConditionId) -> ConditionId {
        self.condition(ConditionNode::Not(inner))
    }

    /// Adds a fixed-material rule.
    pub fn block(&mut self, material: MaterialId) -> RuleId {
        self.rule(RuleNode::Block(material))
    }

    /// Adds a first-match sequence rule.
    pub fn sequence(&mut self, children: Vec<RuleId>) -> RuleId {
        self.rule(RuleNode::Sequence(children))
    }

    /// Adds a condition-gated rule.
    pub fn conditional(&mut self, condition: ConditionId, then_rule: RuleId) -> RuleId {
        self.rule(RuleNode::Conditional {
            condition,
            then_rule,
        })
    }

    /// Adds a banded-material rule.
    pub fn bands(&mut self) -> RuleId {
        self.rule(RuleNode::Bands)
    }

    /// Adds an arbitrary rule node.
    pub fn rule(&mut self, node: RuleNode) -> RuleId {
        self.rules.push(node);
        RuleId(self.rules.len() - 1)
    }

    /// Finishes the tree with the given root.
    #[must_use]
    pub fn build(self, root: RuleId) -> RuleTree {
        RuleTree {
            conditions: self.conditions,
            rules: self.rules,
            root,
        }
    }
}
