pub mod property_input;
