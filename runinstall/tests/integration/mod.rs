mod shim_tests;
