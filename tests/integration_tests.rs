mod integration {
    mod deletion_tests;
    mod scan_tests;
    mod shell_tests;
}
