/*!
Types shared by the stages of the synthesis pipeline.
*/

pub mod alphabet;
pub mod id;
