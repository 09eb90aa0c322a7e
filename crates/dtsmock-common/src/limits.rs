//! Centralized limits and thresholds for mock synthesis.
//!
//! Synthesis is a depth-first recursive walk over a cyclic declaration graph.
//! Cycle detection keeps it finite, but a pathological corpus can still nest
//! deeply enough to matter, so the walk carries explicit bounds.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth of the synthesis call path.
///
/// Every entity currently being synthesized sits on the call path. Past this
/// depth the synthesizer stops recursing and substitutes a diagnostic
/// placeholder for the entity at the boundary.
///
/// # TypeScript example
///
/// ```typescript
/// // Each nested namespace, member and type argument adds one level:
/// declare namespace a { namespace b { namespace c { /* ... */ } } }
/// type Deep = Promise<Array<Map<string, Promise</* ... */>>>>;
/// ```
pub const MAX_SYNTH_DEPTH: usize = 256;

/// Maximum number of `parent` hops taken while walking a lexical scope chain.
///
/// Parent edges form a tree, so a well-formed graph always terminates long
/// before this. The bound guards against a malformed dump whose parent links
/// loop.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

// =============================================================================
// Output Limits
// =============================================================================

/// Number of global initialization statements written per batch.
///
/// The global emitter splits its ordered statement list into batches of this
/// size; each batch becomes one addressable output unit.
pub const DEFAULT_GLOBAL_BATCH_SIZE: usize = 100;
