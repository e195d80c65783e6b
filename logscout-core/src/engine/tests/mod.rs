mod remote_tests;
