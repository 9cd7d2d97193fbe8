//! Content stream operator implementations.
//!
//! Operators are grouped by category:
//! - `graphics_state` - State stack and parameters (q, Q, cm, w, J, j, M, d, ri, i, gs)
//! - `color` - Color space and values (G, g, RG, rg, K, k, CS, cs, SC, SCN, sc, scn)
//! - `path` - Path construction and painting (m, l, c, v, y, h, re, S, s, f, F, f\*, B, B\*, b, b\*, n, W, W\*)
//! - `xobject` - Shadings and XObjects (sh, Do)

mod color;
mod graphics_state;
mod path;
mod xobject;
