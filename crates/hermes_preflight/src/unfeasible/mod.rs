pub mod unassigned_record;
pub mod unfeasibility_detector;
