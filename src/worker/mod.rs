pub mod birthday_sweep_worker;
