pub mod boll;
