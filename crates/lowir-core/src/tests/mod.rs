/*! Unit coverage for the target IR.
 *
 * The lowering pass trusts these pieces to reject malformed instructions early, so the tests focus
 * on the checks the builder and the intrinsic matcher perform rather than on plain accessors.
 */

mod metadata_tests;
