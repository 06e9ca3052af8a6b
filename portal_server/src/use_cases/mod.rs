pub mod logout;
pub mod session_gate;
pub mod verifiers;

#[cfg(test)]
pub(crate) mod test_support;
