//! block-forge links modular shader blocks into one merged block.
//!
//! A block is a named unit of shader logic with typed input and output
//! variables. Linking walks the blocks in caller order, resolving every input
//! against previously produced outputs through a scope stack (with alias
//! fallback), and promotes whatever cannot be wired (or, for properties,
//! must not be) into new inputs on the merged block. The result carries enough
//! source/alias metadata for a downstream code generator to emit the merged
//! function body, and for the whole merge to be fed into a further merge.

pub mod dsl;
pub mod linker;
