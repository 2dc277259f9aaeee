// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: digit samples going in, weight matrices coming out.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits

// A labelled 28x28 digit image
pub mod sample;

// Host-side snapshot of the trained parameters in export layout
pub mod weights;

// Core abstractions (traits) that other layers implement
pub mod traits;
